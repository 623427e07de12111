//! Data models for releases and their downloadable assets.
//!
//! - [`Release`]: one version's entry extracted from a changelog
//! - [`Asset`] / [`AssetMethod`]: a downloadable file published with a release
//! - [`AssetList`]: name-keyed collection of assets, attached to a stored release
//!
//! Field names on the wire follow what the site templates read, hence the
//! `version` rename on [`Release::tag`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// A single release extracted from a changelog.
///
/// # Fields
///
/// * `tag` - The release tag, conventionally `v`-prefixed (`v1.0.0`)
/// * `date` - The date exactly as written in the changelog heading
/// * `changes` - The release notes, trimmed of surrounding blank lines
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Release {
    /// Release tag, stored under `version` for the site templates.
    #[serde(rename = "version")]
    pub tag: String,
    /// Date as written in the changelog. Never parsed.
    pub date: String,
    /// Free-form notes for this release. May be empty.
    pub changes: String,
}

impl Release {
    pub fn new(tag: impl Into<String>, date: impl Into<String>, changes: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            date: date.into(),
            changes: changes.into(),
        }
    }

    /// The record's serialized form as a JSON object, ready to be merged with extra fields.
    pub fn to_json_map(&self) -> serde_json::Result<Map<String, Value>> {
        match serde_json::to_value(self)? {
            Value::Object(obj) => Ok(obj),
            other => Err(serde::ser::Error::custom(format!(
                "release serialized to a non-object: {other}"
            ))),
        }
    }
}

/// How a downloadable asset is obtained by the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetMethod {
    /// A file attached to the hosting release (`github-asset`).
    GithubAsset,
    /// A file fetched from an arbitrary URL (`url`).
    Url,
}

impl AssetMethod {
    /// The JSON key this method is serialized under.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GithubAsset => "github-asset",
            Self::Url => "url",
        }
    }
}

impl fmt::Display for AssetMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "github-asset" => Ok(Self::GithubAsset),
            "url" => Ok(Self::Url),
            other => Err(format!(
                "unknown asset method '{other}' (expected 'github-asset' or 'url')"
            )),
        }
    }
}

/// A downloadable file published alongside a release.
///
/// Serializes as `{"name": <name>, <method>: <param>}`, e.g.
/// `{"name": "linux64", "github-asset": "app-linux-x64.tar.gz"}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    /// Display name of the asset.
    pub name: String,
    /// Where the asset comes from.
    pub method: AssetMethod,
    /// The URL, or the filename of the release attachment.
    pub param: String,
}

impl Asset {
    pub fn new(name: impl Into<String>, method: AssetMethod, param: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            method,
            param: param.into(),
        }
    }

    pub fn to_json(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("name".to_string(), Value::String(self.name.clone()));
        obj.insert(self.method.as_str().to_string(), Value::String(self.param.clone()));
        Value::Object(obj)
    }
}

/// Parses the command-line form `NAME=METHOD:PARAM`.
///
/// Only the first `=` and the first `:` after it are separators, so URLs
/// like `https://...` survive intact in `PARAM`.
impl FromStr for Asset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, rest) = s
            .split_once('=')
            .ok_or_else(|| format!("expected NAME=METHOD:PARAM, got '{s}'"))?;
        let (method, param) = rest
            .split_once(':')
            .ok_or_else(|| format!("expected NAME=METHOD:PARAM, got '{s}'"))?;
        if name.is_empty() || param.is_empty() {
            return Err(format!("asset name and parameter must be non-empty in '{s}'"));
        }
        Ok(Self::new(name, method.parse()?, param))
    }
}

/// Assets keyed by name, in first-insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetList {
    assets: Vec<Asset>,
}

impl AssetList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an asset, replacing any existing asset with the same name in place.
    pub fn put(&mut self, asset: Asset) {
        match self.assets.iter_mut().find(|a| a.name == asset.name) {
            Some(existing) => *existing = asset,
            None => self.assets.push(asset),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// The JSON array stored under the release's `assets` field.
    pub fn assets_json(&self) -> Value {
        Value::Array(self.assets.iter().map(Asset::to_json).collect())
    }

    /// `{"assets": [...]}`, as extra fields for a stored release.
    pub fn to_json_map(&self) -> Map<String, Value> {
        let mut obj = Map::new();
        obj.insert("assets".to_string(), self.assets_json());
        obj
    }
}

impl FromIterator<Asset> for AssetList {
    fn from_iter<I: IntoIterator<Item = Asset>>(iter: I) -> Self {
        let mut list = Self::new();
        for asset in iter {
            list.put(asset);
        }
        list
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_release_serialization_uses_version_key() {
        let release = Release::new("v1.0.0", "2022-10-25", "Initial version");
        let json = serde_json::to_value(&release).unwrap();
        assert_eq!(
            json,
            json!({"version": "v1.0.0", "date": "2022-10-25", "changes": "Initial version"})
        );
    }

    #[test]
    fn test_release_json_map_matches_serde() {
        let release = Release::new("v0.2.0", "2023-01-01", "- fixed\n- added");
        let map = release.to_json_map().unwrap();
        assert_eq!(Value::Object(map), serde_json::to_value(&release).unwrap());
    }

    #[test]
    fn test_asset_list_empty() {
        assert_eq!(Value::Object(AssetList::new().to_json_map()), json!({"assets": []}));
    }

    #[test]
    fn test_asset_list_one() {
        let mut list = AssetList::new();
        list.put(Asset::new("linux64", AssetMethod::GithubAsset, "my-asset-linux-x64.tar.gz"));
        assert_eq!(
            Value::Object(list.to_json_map()),
            json!({
                "assets": [
                    { "name": "linux64", "github-asset": "my-asset-linux-x64.tar.gz" }
                ]
            })
        );
    }

    #[test]
    fn test_asset_list_put_replaces_in_place() {
        let mut list = AssetList::new();
        list.put(Asset::new("linux64", AssetMethod::GithubAsset, "old.tar.gz"));
        list.put(Asset::new("win64", AssetMethod::Url, "https://example.com/win.zip"));
        list.put(Asset::new("linux64", AssetMethod::Url, "https://example.com/new.tar.gz"));

        assert_eq!(list.len(), 2);
        assert_eq!(
            list.assets_json(),
            json!([
                { "name": "linux64", "url": "https://example.com/new.tar.gz" },
                { "name": "win64", "url": "https://example.com/win.zip" }
            ])
        );
    }

    #[test]
    fn test_asset_from_str() {
        let asset: Asset = "docs=url:https://example.com/docs.zip".parse().unwrap();
        assert_eq!(asset.name, "docs");
        assert_eq!(asset.method, AssetMethod::Url);
        assert_eq!(asset.param, "https://example.com/docs.zip");

        let asset: Asset = "linux64=github-asset:app.tar.gz".parse().unwrap();
        assert_eq!(asset.method, AssetMethod::GithubAsset);
    }

    #[test]
    fn test_asset_from_str_rejects_bad_input() {
        assert!("no-separator".parse::<Asset>().is_err());
        assert!("name=nomethod".parse::<Asset>().is_err());
        assert!("name=ftp:file".parse::<Asset>().is_err());
        assert!("=url:x".parse::<Asset>().is_err());
        assert!("name=url:".parse::<Asset>().is_err());
    }
}
