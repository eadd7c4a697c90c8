use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use log::{info, warn};

use crate::domain::{ItemCatalog, ItemId, RatingMatrix, UserId};
use crate::errors::{load_context, parse_context};

const CATALOG_SEPARATOR: char = '|';
const RECORD_SEPARATOR: char = '\t';

/// Load the item catalog: one `id|name|...` record per line
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<ItemCatalog> {
    let content = read_lossy(path.as_ref(), "item catalog")?;
    let catalog = parse_catalog(&content)?;
    info!("Loaded {} items from {}", catalog.len(), path.as_ref().display());
    Ok(catalog)
}

/// Load ratings: `user<TAB>item<TAB>rating[<TAB>timestamp]` per line
pub fn load_ratings<P: AsRef<Path>>(path: P, catalog: &ItemCatalog) -> Result<RatingMatrix> {
    let content = read_lossy(path.as_ref(), "ratings")?;
    let matrix = parse_ratings(&content, catalog)?;
    info!(
        "Loaded {} ratings by {} users from {}",
        matrix.num_ratings(),
        matrix.num_users(),
        path.as_ref().display()
    );
    Ok(matrix)
}

/// Load batch prediction queries: `user<TAB>item` per line
pub fn load_queries<P: AsRef<Path>>(path: P) -> Result<Vec<(UserId, ItemId)>> {
    let content = read_lossy(path.as_ref(), "queries")?;
    let queries = parse_queries(&content)?;
    info!("Loaded {} queries from {}", queries.len(), path.as_ref().display());
    Ok(queries)
}

pub fn parse_catalog(content: &str) -> Result<ItemCatalog> {
    let mut catalog = ItemCatalog::new();

    for (line_number, line) in numbered_lines(content) {
        let mut fields = line.split(CATALOG_SEPARATOR);
        let (Some(id), Some(name)) = (fields.next(), fields.next()) else {
            bail!("{}: expected id|name", parse_context("catalog entry", line_number));
        };
        catalog.add(id.trim(), name.trim());
    }

    Ok(catalog)
}

pub fn parse_ratings(content: &str, catalog: &ItemCatalog) -> Result<RatingMatrix> {
    let mut matrix = RatingMatrix::new();

    for (line_number, line) in numbered_lines(content) {
        let fields: Vec<&str> = line.split(RECORD_SEPARATOR).map(str::trim).collect();
        if fields.len() < 3 {
            bail!(
                "{}: expected user, item and rating",
                parse_context("rating", line_number)
            );
        }

        let rating = parse_rating_value(fields[2], line_number)?;
        let item = catalog.resolve(fields[1]);

        if matrix.insert(fields[0], item.as_str(), rating).is_some() {
            warn!(
                "Duplicate rating of {} by user {} on line {}, keeping the last one",
                item, fields[0], line_number
            );
        }
    }

    Ok(matrix)
}

pub fn parse_queries(content: &str) -> Result<Vec<(UserId, ItemId)>> {
    numbered_lines(content)
        .map(|(line_number, line)| {
            let mut fields = line.split(RECORD_SEPARATOR).map(str::trim);
            match (fields.next(), fields.next()) {
                (Some(user), Some(item)) if !user.is_empty() && !item.is_empty() => {
                    Ok((user.to_string(), item.to_string()))
                }
                _ => bail!("{}: expected user and item", parse_context("query", line_number)),
            }
        })
        .collect()
}

fn parse_rating_value(field: &str, line_number: usize) -> Result<f64> {
    let rating: f64 = field
        .parse()
        .with_context(|| parse_context("rating", line_number))?;

    if !rating.is_finite() {
        bail!("{}: rating is not a finite number", parse_context("rating", line_number));
    }
    Ok(rating)
}

/// Non-blank lines with 1-based line numbers
fn numbered_lines(content: &str) -> impl Iterator<Item = (usize, &str)> {
    content
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line))
        .filter(|(_, line)| !line.trim().is_empty())
}

/// Legacy rating dumps are not always valid UTF-8
fn read_lossy(path: &Path, data_type: &str) -> Result<String> {
    let bytes = fs::read(path).with_context(|| load_context(data_type, &path.display().to_string()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
