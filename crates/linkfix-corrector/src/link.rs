//! Parsing and rewriting of item links
//!
//! Two link shapes point at an item of the instance:
//!
//! - query form: `https://host/perspective.req?projectId=5&docId=100`
//!   (older links separate parameters with `;`)
//! - path form: `https://host/perspective.req#/items/100?projectId=5`
//!   (the route may also sit in the path instead of the fragment)

use crate::anchor::decode_entities;
use crate::error::CorrectorError;
use linkfix_domain::{ItemId, ProjectId};
use url::Url;

/// Which of the two link shapes a target was read from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkForm {
    /// `projectId` and `docId` query parameters
    Query,
    /// `items/<id>` route with a `projectId` parameter
    Path,
}

/// Project and item a link points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkTarget {
    /// Linked project
    pub project: ProjectId,
    /// Linked item
    pub item: ItemId,
    /// Shape the ids were read from
    pub form: LinkForm,
}

/// Parse an href
///
/// Returns `Ok(None)` for anything that is not a link into the instance
/// (other hosts, relative or unparsable URLs, mail links) and an error for
/// instance links whose ids cannot be read.
///
/// # Examples
///
/// ```
/// use linkfix_corrector::link::{parse_link, LinkForm};
///
/// let target = parse_link("https://h/path?projectId=5&docId=100", "h")
///     .unwrap()
///     .unwrap();
/// assert_eq!(target.project.value(), 5);
/// assert_eq!(target.item.value(), 100);
/// assert_eq!(target.form, LinkForm::Query);
///
/// assert!(parse_link("https://elsewhere.org/?docId=1", "h").unwrap().is_none());
/// ```
pub fn parse_link(href: &str, instance_host: &str) -> Result<Option<LinkTarget>, CorrectorError> {
    let decoded = decode_entities(href.trim());
    let Ok(url) = Url::parse(&decoded) else {
        return Ok(None);
    };
    let Some(host) = url.host_str() else {
        return Ok(None);
    };
    if !host.eq_ignore_ascii_case(instance_host.trim()) {
        return Ok(None);
    }

    let query = url.query().unwrap_or_default();
    let project = query_param(query, "projectId");

    if let (Some(project), Some(item)) = (project, query_param(query, "docId")) {
        return Ok(Some(LinkTarget {
            project,
            item,
            form: LinkForm::Query,
        }));
    }

    // Path form: the route lives in the fragment or the path, and the project
    // parameter either in the fragment's own query or in the URL query.
    let (fragment_path, fragment_query) = match url.fragment() {
        Some(fragment) => fragment.split_once('?').unwrap_or((fragment, "")),
        None => ("", ""),
    };
    let item = item_segment(fragment_path).or_else(|| item_segment(url.path()));
    let project = query_param(fragment_query, "projectId").or(project);

    match (project, item) {
        (Some(project), Some(item)) => Ok(Some(LinkTarget {
            project,
            item,
            form: LinkForm::Path,
        })),
        _ => Err(CorrectorError::InvalidLink(href.to_string())),
    }
}

fn query_param<T: std::str::FromStr>(query: &str, key: &str) -> Option<T> {
    query
        .split(['&', ';'])
        .filter_map(|pair| pair.split_once('='))
        .find(|(name, _)| *name == key)
        .and_then(|(_, value)| value.trim().parse().ok())
}

fn item_segment(path: &str) -> Option<ItemId> {
    let mut segments = path.split('/').filter(|s| !s.is_empty());
    while let Some(segment) = segments.next() {
        if segment == "items" {
            return segments.next().and_then(|id| id.parse().ok());
        }
    }
    None
}

/// Point a raw href value at another project and item
///
/// Works on the raw attribute value, so entity-encoded separators survive.
/// Only complete id tokens are replaced: `projectId=5` never matches inside
/// `projectId=55`.
///
/// ```
/// use linkfix_corrector::link::{parse_link, rewrite_href};
/// use linkfix_domain::{ItemId, ProjectId};
///
/// let href = "https://h/path?projectId=5&amp;docId=100";
/// let target = parse_link(href, "h").unwrap().unwrap();
/// assert_eq!(
///     rewrite_href(href, &target, ProjectId::new(7), ItemId::new(200)),
///     "https://h/path?projectId=7&amp;docId=200"
/// );
/// ```
pub fn rewrite_href(
    href: &str,
    target: &LinkTarget,
    project: ProjectId,
    item: ItemId,
) -> String {
    let href = replace_id(href, "projectId=", target.project.value(), project.value());
    let href = replace_id(&href, "docId=", target.item.value(), item.value());
    replace_id(&href, "items/", target.item.value(), item.value())
}

fn replace_id(haystack: &str, prefix: &str, old: u64, new: u64) -> String {
    if old == new {
        return haystack.to_string();
    }

    let needle = format!("{}{}", prefix, old);
    let mut out = String::with_capacity(haystack.len());
    let mut cursor = 0;

    for (start, _) in haystack.match_indices(&needle) {
        if start < cursor {
            continue;
        }
        let end = start + needle.len();
        let bounded_before = haystack[..start]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_ascii_alphanumeric());
        let bounded_after = haystack[end..]
            .chars()
            .next()
            .map_or(true, |c| !c.is_ascii_digit());

        if bounded_before && bounded_after {
            out.push_str(&haystack[cursor..start]);
            out.push_str(prefix);
            out.push_str(&new.to_string());
            cursor = end;
        }
    }

    out.push_str(&haystack[cursor..]);
    out
}
