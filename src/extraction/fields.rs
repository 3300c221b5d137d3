// src/extraction/fields.rs
//! Independent lookups for the posting's header fields

use regex::Regex;
use reqwest::Url;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

use crate::config::ExtractorConfig;
use crate::dom;
use crate::utils::{is_http_url, strip_aria_label};

const LINKEDIN_JOB_VIEW_URL: &str = "https://www.linkedin.com/jobs/view/";
const WORK_TYPES: &[&str] = &["Remote", "Hybrid", "On-site"];
const COUNTRY_NAMES: &[&str] = &["United Kingdom", "United States", "Canada", "Australia"];
const PROFILE_PATH: &str = "/in/";

static JOB_ID_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d{10}").expect("valid regex"));
static SALARY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)[£$€]\s*\d[\d,]*K").expect("valid regex"));
static CITY_STATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Z][a-z]+,\s*[A-Z]{2}(?:\s|$)").expect("valid regex"));
static WORK_TYPE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:Remote|Hybrid|On-site)\b").expect("valid regex"));
static JOB_TITLE_WORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:Director|Manager|Engineer|Lead|Senior|Junior|Analyst|Specialist|Coordinator)\b")
        .expect("valid regex")
});

static MAIN: LazyLock<Selector> = LazyLock::new(|| Selector::parse("main").expect("valid selector"));
static TITLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("title").expect("valid selector"));
static H1: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h1").expect("valid selector"));
static IMG: LazyLock<Selector> = LazyLock::new(|| Selector::parse("img").expect("valid selector"));
static ANCHOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").expect("valid selector"));
static HEADINGS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h1, h2, h3, h4, h5, h6").expect("valid selector"));
static COMPANY_LABEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"[aria-label*="Company,"]"#).expect("valid selector"));
static LOCATION_LABEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"[aria-label*="Location,"]"#).expect("valid selector"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub name: String,
    pub url: String,
}

pub fn main_region(document: &Html) -> Option<ElementRef<'_>> {
    document.select(&MAIN).next()
}

/// The page counts as rendered once `main` carries some text
pub fn is_page_ready(document: &Html, config: &ExtractorConfig) -> bool {
    main_region(document)
        .map(|main| dom::rendered_text_len(main) > config.min_main_text_len)
        .unwrap_or(false)
}

/// Canonical job view URL from the first ten-digit id in the page URL.
///
/// Without an id only an http(s) page URL is kept; anything else is empty.
pub fn job_url(page_url: &str) -> String {
    match JOB_ID_RE.find(page_url) {
        Some(id) => format!("{}{}", LINKEDIN_JOB_VIEW_URL, id.as_str()),
        None if is_http_url(page_url) => page_url.trim().to_string(),
        None => String::new(),
    }
}

pub fn company(document: &Html, lines: &[String]) -> String {
    let labelled = document
        .select(&COMPANY_LABEL)
        .filter_map(|el| el.value().attr("aria-label"))
        .map(|label| strip_aria_label(label, "Company, "))
        .find(|name| !name.is_empty());

    labelled.unwrap_or_else(|| {
        lines
            .iter()
            .take(10)
            .find(|line| {
                let len = line.chars().count();
                len > 2 && len < 100 && !line.contains('·')
            })
            .cloned()
            .unwrap_or_default()
    })
}

pub fn title(document: &Html, lines: &[String]) -> String {
    let from_page_title = document
        .select(&TITLE)
        .next()
        .map(dom::rendered_text)
        .and_then(|text| text.split('|').next().map(|part| part.trim().to_string()))
        .filter(|title| !title.is_empty());

    from_page_title
        .or_else(|| {
            document
                .select(&H1)
                .next()
                .map(dom::rendered_text)
                .filter(|title| !title.is_empty())
        })
        .or_else(|| lines.get(1).cloned())
        .unwrap_or_default()
}

pub fn location(document: &Html, lines: &[String]) -> String {
    let labelled = document
        .select(&LOCATION_LABEL)
        .filter_map(|el| el.value().attr("aria-label"))
        .map(|label| strip_aria_label(label, "Location, "))
        .find(|place| !place.is_empty());

    if let Some(place) = labelled {
        return place;
    }

    lines
        .iter()
        .take(20)
        .find(|line| looks_like_location(line) && !JOB_TITLE_WORD_RE.is_match(line))
        .map(|line| line.split('·').next().unwrap_or_default().trim().to_string())
        .unwrap_or_default()
}

fn looks_like_location(line: &str) -> bool {
    CITY_STATE_RE.is_match(line)
        || COUNTRY_NAMES.iter().any(|country| line.contains(country))
        || WORK_TYPE_RE.is_match(line)
}

/// First work-type keyword present anywhere in the main text
pub fn work_type(main_text: &str) -> String {
    WORK_TYPES
        .iter()
        .find(|keyword| main_text.contains(*keyword))
        .map(|keyword| keyword.to_string())
        .unwrap_or_default()
}

pub fn salary(lines: &[String]) -> String {
    lines
        .iter()
        .find(|line| SALARY_RE.is_match(line))
        .cloned()
        .unwrap_or_default()
}

pub fn company_logo(document: &Html, base: Option<&Url>) -> Option<String> {
    document
        .select(&IMG)
        .find(|img| {
            let alt = img.value().attr("alt").unwrap_or_default().to_lowercase();
            let src = img.value().attr("src").unwrap_or_default().to_lowercase();
            alt.contains("logo") || src.contains("company")
        })
        .and_then(|img| dom::resolve_url(img.value().attr("src")?, base))
}

/// Profile link of the hiring contact
pub fn contact(document: &Html, base: Option<&Url>, config: &ExtractorConfig) -> Option<Contact> {
    after_hiring_team(document, base, config)
        .or_else(|| first_eligible_profile(document, base, config))
        .map(|(link, url)| Contact {
            name: dom::rendered_text(link),
            url,
        })
}

fn profile_href(el: ElementRef<'_>, base: Option<&Url>) -> Option<String> {
    if dom::tag_name(el) != "a" {
        return None;
    }
    dom::resolve_href(el, base).filter(|href| href.contains(PROFILE_PATH))
}

/// First profile link following the "Meet the hiring team" label in document order
fn after_hiring_team<'a>(
    document: &'a Html,
    base: Option<&Url>,
    config: &ExtractorConfig,
) -> Option<(ElementRef<'a>, String)> {
    let phrase = config.hiring_team_phrase.as_str();
    let mut elements = document.root_element().descendants().filter_map(ElementRef::wrap);

    elements.find(|el| dom::is_leaf(*el) && dom::rendered_text(*el) == phrase)?;
    elements.find_map(|el| profile_href(el, base).map(|href| (el, href)))
}

fn first_eligible_profile<'a>(
    document: &'a Html,
    base: Option<&Url>,
    config: &ExtractorConfig,
) -> Option<(ElementRef<'a>, String)> {
    document
        .select(&ANCHOR)
        .filter(|link| !in_navigation(*link))
        .filter(|link| !under_reach_out_section(*link, config))
        .find_map(|link| profile_href(link, base).map(|href| (link, href)))
}

fn in_navigation(el: ElementRef<'_>) -> bool {
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .any(|a| matches!(dom::tag_name(a), "nav" | "header"))
}

fn under_reach_out_section(el: ElementRef<'_>, config: &ExtractorConfig) -> bool {
    let phrase = config.reach_out_phrase.as_str();
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .take_while(|a| dom::tag_name(*a) != "body")
        .any(|ancestor| {
            ancestor
                .select(&HEADINGS)
                .any(|heading| dom::rendered_text(heading) == phrase)
        })
}
