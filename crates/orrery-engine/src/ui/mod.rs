pub mod notices;

pub use notices::{HostNotice, Notice, NoticeBoard, NoticeLevel, NoticeTimings};
