//! Catalog URL adapter for the Follett Destiny OPAC.
//!
//! The single translator between a numeric bibliographic identifier (bibID)
//! and the vendor's deep-link URL format, and the single validator/parser of
//! such URLs pasted into admin forms. Validity is structural only; nothing
//! here calls the vendor to confirm a record exists.

use chrono::Utc;
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;
use url::Url;

/// Fixed host of the vendor's catalog for this tenant.
pub const CATALOG_HOST: &str = "phinmacoclibrary-opac.follettdestiny.com";
/// Detail-view servlet path of a single title record.
pub const TITLE_DETAIL_PATH: &str = "/cataloging/servlet/presenttitledetailform.do";
/// Alternate landing path the vendor also serves records under.
pub const WELCOME_PATH: &str = "/common/welcome.jsp";

// Tenant parameters the vendor expects on every deep link.
const SITE: &str = "100";
const SITE_TYPE_ID: &str = "-2";
const CONTEXT: &str = "saas99_8210704";

#[derive(Debug, Error)]
pub enum CatalogUrlError {
    #[error("Invalid Destiny URL format - bibID not found")]
    BibIdNotFound,
}

/// Transient description of a target catalog page. Built on demand when a
/// user triggers "view in catalog" and discarded after navigation; never
/// stored.
#[derive(Debug, Clone)]
pub struct CatalogDeepLink {
    bib_id: String,
    /// Freshness token; present only so the vendor never serves a cached
    /// page. The vendor does not interpret the value.
    walker_id: i64,
}

impl CatalogDeepLink {
    /// Deep link stamped with the current wall-clock milliseconds.
    pub fn new(bib_id: impl Into<String>) -> Self {
        Self::at(bib_id, Utc::now().timestamp_millis())
    }

    /// Deep link with an explicit freshness token.
    pub fn at(bib_id: impl Into<String>, walker_id: i64) -> Self {
        CatalogDeepLink {
            bib_id: bib_id.into(),
            walker_id,
        }
    }

    pub fn bib_id(&self) -> &str {
        &self.bib_id
    }

    /// Render the absolute vendor URL. Two renderings of the same bibID
    /// differ only in the `walkerID` parameter.
    pub fn to_url(&self) -> Url {
        let mut url = Url::parse(&format!("https://{}{}", CATALOG_HOST, TITLE_DETAIL_PATH))
            .expect("vendor base URL is well-formed");
        url.query_pairs_mut()
            .append_pair("site", SITE)
            .append_pair("context", CONTEXT)
            .append_pair("includeLibrary", "true")
            .append_pair("includeMedia", "false")
            .append_pair("mediaSiteID", "")
            .append_pair("siteTypeID", SITE_TYPE_ID)
            .append_pair("bibID", &self.bib_id)
            .append_pair("walkerID", &self.walker_id.to_string());
        url
    }
}

impl std::fmt::Display for CatalogDeepLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_url())
    }
}

/// Build the canonical deep link for `bib_id`. Pure string construction;
/// never fails. The bibID appears verbatim in the query string.
pub fn generate_catalog_url(bib_id: &str) -> String {
    CatalogDeepLink::new(bib_id).to_url().into()
}

/// Structural validation of a pasted catalog URL: absolute, vendor host,
/// detail or welcome path, and a bibID in the query or hash fragment.
/// Malformed input yields `false`, never a panic.
pub fn validate_catalog_url(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    if parsed.host_str() != Some(CATALOG_HOST) {
        return false;
    }
    if !matches!(parsed.path(), TITLE_DETAIL_PATH | WELCOME_PATH) {
        return false;
    }
    bib_id_of(&parsed).is_some()
}

/// Strict bibID extraction: exact-case `bibID` lookup in the query string,
/// then in the fragment re-parsed as its own query string. `None` when the
/// URL does not parse or carries no bibID.
pub fn extract_bib_id(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    bib_id_of(&parsed)
}

fn bib_id_of(parsed: &Url) -> Option<String> {
    if let Some(value) = parsed
        .query_pairs()
        .find(|(key, _)| key == "bibID")
        .map(|(_, value)| value.into_owned())
    {
        return Some(value);
    }

    // Some vendor pages carry their parameters after the hash instead.
    let fragment = parsed.fragment()?;
    url::form_urlencoded::parse(fragment.as_bytes())
        .find(|(key, _)| key == "bibID")
        .map(|(_, value)| value.into_owned())
}

/// Lenient bibID extraction for upload/edit forms: a case-insensitive scan
/// of the raw string for `bibID=<digits>`, no URL parsing at all. Unlike
/// [`extract_bib_id`] this reports absence as an error the calling form
/// surfaces as a validation message.
pub fn extract_bib_id_lenient(raw: &str) -> Result<String, CatalogUrlError> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern =
        PATTERN.get_or_init(|| Regex::new(r"(?i)bibID=(\d+)").expect("bibID pattern compiles"));

    pattern
        .captures(raw)
        .and_then(|captures| captures.get(1))
        .map(|digits| digits.as_str().to_string())
        .ok_or(CatalogUrlError::BibIdNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_url_round_trips_bib_id() {
        for bib_id in ["305", "4821", "9001", "1"] {
            let url = generate_catalog_url(bib_id);
            assert_eq!(extract_bib_id(&url).as_deref(), Some(bib_id));
            assert!(validate_catalog_url(&url), "generated URL invalid: {}", url);
        }
    }

    #[test]
    fn test_bib_id_appears_verbatim() {
        let url = generate_catalog_url("4821");
        assert!(url.contains("bibID=4821"));
    }

    #[test]
    fn test_generations_differ_only_in_walker_id() {
        // Two links for the same record one millisecond apart.
        let first = CatalogDeepLink::at("9001", 1_700_000_000_000).to_url();
        let second = CatalogDeepLink::at("9001", 1_700_000_000_001).to_url();

        let strip = |url: &Url| -> Vec<(String, String)> {
            url.query_pairs()
                .filter(|(key, _)| key != "walkerID")
                .map(|(key, value)| (key.into_owned(), value.into_owned()))
                .collect()
        };
        assert_eq!(strip(&first), strip(&second));

        let walker = |url: &Url| -> Option<String> {
            url.query_pairs()
                .find(|(key, _)| key == "walkerID")
                .map(|(_, value)| value.into_owned())
        };
        assert_ne!(walker(&first), walker(&second));
    }

    #[test]
    fn test_validate_rejects_wrong_host() {
        let url = format!(
            "https://another-opac.follettdestiny.com{}?bibID=42",
            TITLE_DETAIL_PATH
        );
        assert!(!validate_catalog_url(&url));
    }

    #[test]
    fn test_validate_rejects_wrong_path() {
        let url = format!("https://{}/cataloging/servlet/other.do?bibID=42", CATALOG_HOST);
        assert!(!validate_catalog_url(&url));
    }

    #[test]
    fn test_validate_rejects_missing_bib_id() {
        let url = format!("https://{}{}?site=100", CATALOG_HOST, TITLE_DETAIL_PATH);
        assert!(!validate_catalog_url(&url));
    }

    #[test]
    fn test_validate_rejects_malformed_url() {
        assert!(!validate_catalog_url("not a url"));
        assert!(!validate_catalog_url(""));
        assert!(!validate_catalog_url("/cataloging/servlet/presenttitledetailform.do?bibID=1"));
    }

    #[test]
    fn test_welcome_path_accepted() {
        let url = format!("https://{}{}?bibID=77", CATALOG_HOST, WELCOME_PATH);
        assert!(validate_catalog_url(&url));
    }

    #[test]
    fn test_fragment_carries_bib_id() {
        let url = format!("https://{}{}#bibID=4821", CATALOG_HOST, WELCOME_PATH);
        assert!(validate_catalog_url(&url));
        assert_eq!(extract_bib_id(&url).as_deref(), Some("4821"));
    }

    #[test]
    fn test_strict_extraction_is_exact_case() {
        let url = format!("https://{}{}?bibid=305", CATALOG_HOST, TITLE_DETAIL_PATH);
        assert_eq!(extract_bib_id(&url), None);
        // The lenient extractor accepts the same string.
        assert_eq!(extract_bib_id_lenient(&url).unwrap(), "305");
    }

    #[test]
    fn test_lenient_extraction_from_pasted_text() {
        let raw = format!("https://{}{}?bibID=305&site=100", CATALOG_HOST, TITLE_DETAIL_PATH);
        assert_eq!(extract_bib_id_lenient(&raw).unwrap(), "305");

        // Not even a URL, still fine
        assert_eq!(extract_bib_id_lenient("see BIBID=12 for details").unwrap(), "12");
    }

    #[test]
    fn test_lenient_extraction_reports_absence() {
        let err = extract_bib_id_lenient("https://example.com/?id=5").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid Destiny URL format - bibID not found"
        );
    }
}
