pub mod executives;
pub mod settings;

pub use executives::Entity as Executives;
pub use executives::Model as Executive;
pub use settings::Entity as Settings;
pub use settings::Model as Setting;
