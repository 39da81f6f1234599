//! Prompt rendering for the three completion calls.
//!
//! Every function here is pure: same input, byte-identical [`PromptPair`].

use brochure_shared::{Link, PromptPair, SiteData};

const CLASSIFY_SYSTEM: &str = r#"You are provided with a list of links found on a webpage.
You are able to decide which of the links would be most relevant to include in a brochure about the company,
such as links to an About page, or a Company page, or Careers/Jobs pages.
You should respond in JSON as in this example:

{
  "relevantLinks": [
    {"linkType": "about page", "link": "https://full.url/goes/here/about"},
    {"linkType": "careers page", "link": "https://another.full.url/careers"}
  ]
}"#;

const SUMMARY_SYSTEM: &str = "You are an assistant that analyzes the contents of a webpage \
and creates a short one paragraph summary. Respond in markdown without code blocks.";

const BROCHURE_SYSTEM: &str = "You are an assistant that analyzes the contents of several relevant pages \
from a company website and creates a short brochure about the company for prospective customers, \
investors and recruits. Respond in markdown without code blocks.
Include details of company culture, customers and careers/jobs if you have the information.";

/// Ask the model to pick brochure-relevant links out of everything found on the page.
pub fn classification_prompt(site: &SiteData) -> PromptPair {
    let user = format!(
        "Here is the list of links on the website {url} -\n\
         Please decide which of these are relevant web links for a brochure about the company, \
         respond with the full https URL in JSON format.\n\
         Do not include Terms of Service, Privacy, email links.\n\n\
         Links:\n{links}\n",
        url = site.url,
        links = site.links.join("\n"),
    );

    PromptPair {
        system: CLASSIFY_SYSTEM.to_string(),
        user,
    }
}

/// Ask for a one-paragraph summary of a single linked page.
///
/// `page` carries the scraped content of the link when it could be fetched.
pub fn summary_prompt(link: &Link, page: Option<&SiteData>) -> PromptPair {
    let mut user = format!(
        "Please provide a summary of this web page\n## Page: {}\n## Type: {}\n",
        link.link, link.link_type
    );

    if let Some(page) = page {
        user.push_str("\n## Contents:\n");
        user.push_str(&page.content);
        user.push('\n');
    }

    PromptPair {
        system: SUMMARY_SYSTEM.to_string(),
        user,
    }
}

/// Ask for the final brochure from the landing page and the enriched links.
pub fn brochure_prompt(company_name: &str, site: &SiteData, relevant_links_text: &str) -> PromptPair {
    let user = format!(
        "You are looking at a company called: {company_name}\n\
         Here are the contents of its landing page and other relevant pages; \
         use this information to build a short brochure of the company in markdown without code blocks.\n\n\
         ## Landing Page:\n{content}\n\n\
         {relevant_links_text}",
        content = site.content,
    );

    PromptPair {
        system: BROCHURE_SYSTEM.to_string(),
        user,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn site() -> SiteData {
        SiteData {
            url: Url::parse("https://acme.test/").unwrap(),
            title: "Acme".into(),
            content: "Acme\n\nWe make anvils.".into(),
            links: vec![
                "https://acme.test/about".into(),
                "https://acme.test/careers".into(),
                "https://acme.test/privacy".into(),
            ],
        }
    }

    fn about() -> Link {
        Link {
            link_type: "about page".into(),
            link: "https://acme.test/about".into(),
        }
    }

    #[test]
    fn classification_prompt_lists_links_and_shape() {
        let prompt = classification_prompt(&site());
        assert!(prompt.system.contains(r#""relevantLinks""#));
        assert!(prompt.system.contains(r#""linkType""#));
        assert!(prompt.user.contains("https://acme.test/ -"));
        assert!(prompt.user.contains(
            "https://acme.test/about\nhttps://acme.test/careers\nhttps://acme.test/privacy"
        ));
        assert!(prompt.user.contains("Do not include Terms of Service, Privacy, email links."));
    }

    #[test]
    fn summary_prompt_without_page_content() {
        let prompt = summary_prompt(&about(), None);
        assert!(prompt.system.contains("one paragraph summary"));
        assert!(prompt.user.contains("## Page: https://acme.test/about"));
        assert!(!prompt.user.contains("## Contents:"));
    }

    #[test]
    fn summary_prompt_embeds_fetched_content() {
        let page = SiteData {
            url: Url::parse("https://acme.test/about").unwrap(),
            title: "About Acme".into(),
            content: "About Acme\n\nFounded in 1949.".into(),
            links: vec![],
        };
        let prompt = summary_prompt(&about(), Some(&page));
        assert!(prompt.user.contains("## Contents:\nAbout Acme\n\nFounded in 1949."));
    }

    #[test]
    fn brochure_prompt_embeds_everything() {
        let links_text = "## Relevant Links:\n### about page\nURL: https://acme.test/about\n\nOld.\n\n";
        let prompt = brochure_prompt("Acme Corp", &site(), links_text);
        assert!(prompt.system.contains("without code blocks"));
        assert!(prompt.system.contains("culture, customers and careers"));
        assert!(prompt.user.contains("company called: Acme Corp"));
        assert!(prompt.user.contains("## Landing Page:\nAcme\n\nWe make anvils."));
        assert!(prompt.user.ends_with(links_text));
    }

    #[test]
    fn builders_are_idempotent() {
        let site = site();
        assert_eq!(classification_prompt(&site), classification_prompt(&site));
        assert_eq!(summary_prompt(&about(), None), summary_prompt(&about(), None));
        assert_eq!(
            summary_prompt(&about(), Some(&site)),
            summary_prompt(&about(), Some(&site))
        );
        assert_eq!(
            brochure_prompt("Acme", &site, "x"),
            brochure_prompt("Acme", &site, "x")
        );
    }
}
