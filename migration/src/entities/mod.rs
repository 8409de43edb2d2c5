pub mod counter;
pub mod short_link_entry;

pub use counter::Entity as CounterEntity;
pub use short_link_entry::Entity as ShortLinkEntryEntity;
