//! RSS 2.0 feed generation.

use rss::{ChannelBuilder, GuidBuilder, ItemBuilder};

use crate::{config::SiteConfig, content::ContentItem, utils::date::DateTimeUtc};

/// Build `rss.xml` over posts and notes, newest first.
pub fn build_rss(config: &SiteConfig, posts: &[ContentItem], notes: &[ContentItem]) -> String {
    build_rss_at(config, posts, notes, DateTimeUtc::now())
}

fn build_rss_at(
    config: &SiteConfig,
    posts: &[ContentItem],
    notes: &[ContentItem],
    built: DateTimeUtc,
) -> String {
    // Stable: same-day and undated items keep posts-then-notes order.
    let mut all: Vec<&ContentItem> = posts.iter().chain(notes).collect();
    all.sort_by(|a, b| b.date.cmp(&a.date));

    let items: Vec<_> = all.into_iter().map(item_to_rss).collect();

    let channel = ChannelBuilder::default()
        .title(&config.title)
        .link(&config.base_url)
        .description(&config.description)
        .generator("verdant".to_string())
        .last_build_date(built.to_rfc2822())
        .items(items)
        .build();

    channel.to_string()
}

fn item_to_rss(item: &ContentItem) -> rss::Item {
    ItemBuilder::default()
        .title(item.title.clone())
        .link(Some(item.url.clone()))
        .guid(
            GuidBuilder::default()
                .permalink(true)
                .value(item.url.clone())
                .build(),
        )
        .description((!item.description.is_empty()).then(|| item.description.clone()))
        .pub_date(item.date.map(DateTimeUtc::to_rfc2822))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::item::tests::item;

    fn built() -> DateTimeUtc {
        DateTimeUtc::new(2024, 6, 1, 12, 0, 0)
    }

    #[test]
    fn test_channel_metadata() {
        let xml = build_rss_at(&SiteConfig::default(), &[], &[], built());
        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains("<rss version=\"2.0\""));
        assert!(xml.contains("<title>My Digital Garden</title>"));
        assert!(xml.contains("<link>/</link>"));
        assert!(xml.contains("<lastBuildDate>Sat, 01 Jun 2024 12:00:00 GMT</lastBuildDate>"));
    }

    #[test]
    fn test_items_sorted_newest_first_undated_last() {
        let posts = [item("old", "2023-01-01", &[]), item("undated", "", &[])];
        let notes = [item("new", "2024-05-01", &[])];
        let xml = build_rss_at(&SiteConfig::default(), &posts, &notes, built());

        let new = xml.find("<title>new</title>").unwrap();
        let old = xml.find("<title>old</title>").unwrap();
        let undated = xml.find("<title>undated</title>").unwrap();
        assert!(new < old && old < undated);
        assert!(xml.contains("<pubDate>Wed, 01 May 2024 00:00:00 GMT</pubDate>"));
        assert_eq!(xml.matches("<pubDate>").count(), 2);
    }

    #[test]
    fn test_item_link_and_guid() {
        let xml = build_rss_at(&SiteConfig::default(), &[item("p", "", &[])], &[], built());
        assert!(xml.contains("<link>/p</link>"));
        assert!(xml.contains("<guid>/p</guid>"));
    }
}
