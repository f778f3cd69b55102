pub mod event_group;
pub mod template;
