mod event_group_repo;
mod template_repo;

pub use event_group_repo::EventGroupRepo;
pub use template_repo::TemplateRepo;
