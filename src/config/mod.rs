//! Configuration module

mod site;

pub use site::CommentsConfig;
pub use site::DeployConfig;
pub use site::SearchConfig;
pub use site::SiteConfig;
pub use site::ThemeConfig;
