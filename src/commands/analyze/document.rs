use anyhow::{Result, anyhow};
use scraper::{ElementRef, Html, Selector};

use crate::model::{SLOT_COUNT, Slot, SlotPresence};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageDocument {
    slots: [Option<String>; SLOT_COUNT],
}

impl PageDocument {
    pub fn parse(html: &str) -> Result<Self> {
        let html = Html::parse_document(html);

        let title = selector("title")?;
        let meta = selector(r#"meta[name="description"]"#)?;
        let h1 = selector("h1")?;
        let h2 = selector("h2")?;
        let h3 = selector("h3")?;
        let body = selector("body")?;

        let h2s = all_elements(&html, &h2);
        let h3s = all_elements(&html, &h3);

        let mut slots: [Option<String>; SLOT_COUNT] = Default::default();
        slots[Slot::Title.index()] = first_element(&html, &title).map(element_text);
        // A description tag without a content attribute counts as empty text.
        slots[Slot::Meta.index()] = first_element(&html, &meta)
            .map(|element| element.value().attr("content").unwrap_or_default().to_string());
        slots[Slot::H1.index()] = first_element(&html, &h1).map(element_text);
        slots[Slot::H2First.index()] = h2s.first().copied().map(element_text);
        slots[Slot::H2Second.index()] = h2s.get(1).copied().map(element_text);
        slots[Slot::H3First.index()] = h3s.first().copied().map(element_text);
        slots[Slot::H3Second.index()] = h3s.get(1).copied().map(element_text);
        slots[Slot::Body.index()] = first_element(&html, &body).map(element_text);

        for text in slots.iter_mut().flatten() {
            *text = text.to_lowercase();
        }

        Ok(Self { slots })
    }

    pub fn slot_text(&self, slot: Slot) -> Option<&str> {
        self.slots[slot.index()].as_deref()
    }
}

pub fn check_presence(document: Option<&PageDocument>, query: &str) -> SlotPresence {
    let mut presence = SlotPresence::default();
    let Some(document) = document else {
        return presence;
    };

    let query = query.to_lowercase();
    for slot in Slot::ALL {
        let present = document
            .slot_text(slot)
            .is_some_and(|text| text.contains(query.as_str()));
        presence.set(slot, present);
    }

    presence
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|err| anyhow!("invalid selector {css:?}: {err}"))
}

fn first_element<'a>(html: &'a Html, selector: &Selector) -> Option<ElementRef<'a>> {
    html.select(selector).next()
}

fn all_elements<'a>(html: &'a Html, selector: &Selector) -> Vec<ElementRef<'a>> {
    html.select(selector).collect()
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!doctype html>
<html>
  <head>
    <title>Running Shoes for Trail &amp; Road</title>
    <meta name="description" content="Lightweight TRAIL running shoes, shipped free.">
  </head>
  <body>
    <h1>Best <em>Running</em> Shoes</h1>
    <h2>Trail shoes</h2>
    <h2>Road shoes</h2>
    <h2>Kids shoes</h2>
    <h3>Sizing</h3>
    <p>Our waterproof collection keeps feet dry.</p>
  </body>
</html>"#;

    fn parse(html: &str) -> PageDocument {
        PageDocument::parse(html).expect("document should parse")
    }

    #[test]
    fn missing_document_reports_every_slot_false() {
        let presence = check_presence(None, "anything");
        assert_eq!(presence.iter().count(), SLOT_COUNT);
        assert!(!presence.any());
    }

    #[test]
    fn each_slot_checks_its_own_element() {
        let document = parse(PAGE);

        let presence = check_presence(Some(&document), "Trail");
        assert!(presence.get(Slot::Title));
        assert!(presence.get(Slot::Meta));
        assert!(!presence.get(Slot::H1));
        assert!(presence.get(Slot::H2First));
        assert!(!presence.get(Slot::H2Second));
        assert!(!presence.get(Slot::H3First));
        assert!(!presence.get(Slot::H3Second));
        assert!(presence.get(Slot::Body));
    }

    #[test]
    fn nested_inline_text_joins_with_spaces() {
        let document = parse(PAGE);
        assert_eq!(document.slot_text(Slot::H1), Some("best  running  shoes"));
        assert!(check_presence(Some(&document), "running").get(Slot::H1));
    }

    #[test]
    fn partial_word_substrings_match() {
        let document = parse(PAGE);
        let presence = check_presence(Some(&document), "proof coll");
        assert!(presence.get(Slot::Body));
        assert!(!presence.get(Slot::Title));
    }

    #[test]
    fn single_h2_forces_second_h2_false() {
        let document = parse("<html><body><h2>shoes</h2><p>shoes</p></body></html>");

        let presence = check_presence(Some(&document), "shoes");
        assert!(presence.get(Slot::H2First));
        assert!(!presence.get(Slot::H2Second));
        assert_eq!(document.slot_text(Slot::H2Second), None);
        assert!(presence.get(Slot::Body));
    }

    #[test]
    fn second_h3_is_checked_independently() {
        let document = parse("<body><h3>sizing</h3><h3>Returns policy</h3></body>");

        let presence = check_presence(Some(&document), "returns");
        assert!(!presence.get(Slot::H3First));
        assert!(presence.get(Slot::H3Second));
    }

    #[test]
    fn absent_elements_only_affect_their_slot() {
        let document = parse("<html><head></head><body><p>running shoes</p></body></html>");

        let presence = check_presence(Some(&document), "running shoes");
        assert!(!presence.get(Slot::Title));
        assert!(!presence.get(Slot::Meta));
        assert!(!presence.get(Slot::H1));
        assert!(presence.get(Slot::Body));
    }

    #[test]
    fn description_without_content_reads_as_empty_text() {
        let document = parse(r#"<head><meta name="description"></head><body></body>"#);

        assert_eq!(document.slot_text(Slot::Meta), Some(""));
        assert!(!check_presence(Some(&document), "shoes").get(Slot::Meta));
    }

    #[test]
    fn other_meta_tags_are_ignored() {
        let document = parse(r#"<head><meta name="keywords" content="shoes"></head>"#);
        assert_eq!(document.slot_text(Slot::Meta), None);
        assert!(!check_presence(Some(&document), "shoes").get(Slot::Meta));
    }

    #[test]
    fn query_case_is_folded() {
        let document = parse(PAGE);
        assert!(check_presence(Some(&document), "WATERPROOF").get(Slot::Body));
    }

    #[test]
    fn page_without_body_tag_still_has_body_text() {
        let document = parse("<p>running shoes</p>");

        assert_eq!(document.slot_text(Slot::Body), Some("running shoes"));
        assert!(check_presence(Some(&document), "running shoes").get(Slot::Body));
        assert_eq!(document.slot_text(Slot::Title), None);
    }

    #[test]
    fn empty_page_has_empty_body_text() {
        let document = parse("");

        assert_eq!(document.slot_text(Slot::Body), Some(""));
        assert!(!check_presence(Some(&document), "shoes").get(Slot::Body));
    }
}
