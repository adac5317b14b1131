use chrono::{NaiveDate, TimeZone, Utc};
use health_blog::{
    models::SitemapPost,
    sitemap::{STATIC_PAGES, render_robots, render_sitemap},
};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
}

#[test]
fn test_sitemap_structure_and_order() {
    let posts = vec![
        SitemapPost {
            slug: "newest".to_string(),
            updated_at: Some(Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap()),
            published_at: Some(Utc.with_ymd_and_hms(2025, 2, 1, 8, 0, 0).unwrap()),
        },
        SitemapPost {
            slug: "older".to_string(),
            updated_at: None,
            published_at: Some(Utc.with_ymd_and_hms(2024, 12, 24, 8, 0, 0).unwrap()),
        },
        SitemapPost {
            slug: "undated".to_string(),
            updated_at: None,
            published_at: None,
        },
    ];
    let categories = vec!["nutrition".to_string()];

    let xml = render_sitemap("https://factfit.com/", &posts, &categories, today());

    assert_eq!(
        xml.matches("<url>").count(),
        STATIC_PAGES.len() + posts.len() + categories.len()
    );
    assert!(xml.contains("xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\""));
    assert!(xml.ends_with("</urlset>"));

    let home = xml.find("<loc>https://factfit.com/</loc>").unwrap();
    let newest = xml.find("<loc>https://factfit.com/blog/newest</loc>").unwrap();
    let older = xml.find("<loc>https://factfit.com/blog/older</loc>").unwrap();
    let category = xml
        .find("<loc>https://factfit.com/category/nutrition</loc>")
        .unwrap();
    assert!(home < newest && newest < older && older < category);
}

#[test]
fn test_post_lastmod_fallbacks() {
    let posts = vec![
        SitemapPost {
            slug: "updated".to_string(),
            updated_at: Some(Utc.with_ymd_and_hms(2025, 3, 1, 23, 30, 0).unwrap()),
            published_at: Some(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()),
        },
        SitemapPost {
            slug: "published-only".to_string(),
            updated_at: None,
            published_at: Some(Utc.with_ymd_and_hms(2024, 12, 24, 8, 0, 0).unwrap()),
        },
        SitemapPost {
            slug: "undated".to_string(),
            updated_at: None,
            published_at: None,
        },
    ];

    let xml = render_sitemap("https://factfit.com", &posts, &[], today());

    assert!(xml.contains(
        "<loc>https://factfit.com/blog/updated</loc>\n    <lastmod>2025-03-01</lastmod>\n    <changefreq>weekly</changefreq>\n    <priority>0.7</priority>"
    ));
    assert!(xml.contains(
        "<loc>https://factfit.com/blog/published-only</loc>\n    <lastmod>2024-12-24</lastmod>"
    ));
    assert!(
        xml.contains("<loc>https://factfit.com/blog/undated</loc>\n    <lastmod>2025-03-10</lastmod>")
    );
}

#[test]
fn test_static_pages_use_their_own_priority() {
    let xml = render_sitemap("https://factfit.com", &[], &[], today());

    assert!(xml.contains(
        "<loc>https://factfit.com/</loc>\n    <lastmod>2025-03-10</lastmod>\n    <changefreq>daily</changefreq>\n    <priority>1.0</priority>"
    ));
    assert!(xml.contains(
        "<loc>https://factfit.com/privacy-policy</loc>\n    <lastmod>2025-03-10</lastmod>\n    <changefreq>yearly</changefreq>\n    <priority>0.3</priority>"
    ));
}

#[test]
fn test_loc_is_escaped() {
    let xml = render_sitemap(
        "https://factfit.com",
        &[],
        &["food&drink".to_string()],
        today(),
    );
    assert!(xml.contains("<loc>https://factfit.com/category/food&amp;drink</loc>"));
}

#[test]
fn test_robots_txt() {
    let robots = render_robots("https://factfit.com/");

    assert!(robots.starts_with("# Robots.txt for Health Blog CMS"));
    assert!(robots.contains("Sitemap: https://factfit.com/sitemap.xml"));
    assert!(robots.contains("Disallow: /*?*"));
    assert!(robots.contains("Allow: /blog?page="));
    assert!(robots.contains("User-agent: SemrushBot\nDisallow: /"));
    assert!(robots.contains("User-agent: Twitterbot\nAllow: /"));
}
