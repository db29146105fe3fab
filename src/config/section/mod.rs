//! Configuration sections.
//!
//! | Module  | TOML Section   | Purpose                          |
//! |---------|----------------|----------------------------------|
//! | `build` | `[build]`      | Content/output paths, drafts     |
//! | `serve` | `[serve]`      | Local server address             |
//! | `site`  | `[site]`       | Page metadata                    |
//! | `store` | `[store]`      | Persisted tool inputs            |
//! | `tools` | `[tools.*]`    | Per-tool input defaults          |

mod build;
mod serve;
mod site;
mod store;
mod tools;

pub use build::BuildConfig;
pub use serve::ServeConfig;
pub use site::SiteConfig;
pub use store::StoreConfig;
pub use tools::ToolsConfig;
