pub mod decoder;
pub mod mailbox;
pub mod shaper;
