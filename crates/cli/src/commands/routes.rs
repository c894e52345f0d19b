use anyhow::{Context, Result};
use blog_kit_content::content_ids;
use blog_kit_core::{LocaleResolver, SiteConfig};
use std::path::{Path, PathBuf};

use super::{content_root, ensure_collection, load_site};

/// One row of the route listing
#[derive(Debug, PartialEq, Eq)]
struct RouteRow {
    id: String,
    locale: Option<String>,
    path: String,
    url: String,
}

/// Print every content id with the route it is served under
pub fn run(root: PathBuf, collection: Option<String>) -> Result<()> {
    let config = load_site(&root)?;

    let collections = match collection {
        Some(name) => {
            ensure_collection(&config, &name)?;
            vec![name]
        }
        None => config.content.collections.clone(),
    };

    for collection in &collections {
        let rows = collect_routes(&root, &config, collection)?;
        println!("📚 {} ({} entries)", collection, rows.len());
        for row in rows {
            println!(
                "   {:<40} {:<6} {:<30} {}",
                row.id,
                row.locale.as_deref().unwrap_or("-"),
                row.path,
                row.url
            );
        }
        println!();
    }

    Ok(())
}

fn collect_routes(root: &Path, config: &SiteConfig, collection: &str) -> Result<Vec<RouteRow>> {
    let resolver = LocaleResolver::new(&config.locales);
    let ids = content_ids(&content_root(root, config), collection)
        .with_context(|| format!("Failed to list collection '{}'", collection))?;
    let base_url = config.site.url.trim_end_matches('/');

    Ok(ids
        .into_iter()
        .map(|id| {
            let params = resolver.to_route_params(&id);
            let url = format!("{}{}", base_url, resolver.route_path(collection, &id));
            RouteRow {
                locale: params.locale,
                path: params.path,
                url,
                id,
            }
        })
        .collect())
}
