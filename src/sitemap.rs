//! sitemap.xml and robots.txt rendering.

use crate::{content::escape_html, models::SitemapPost};
use chrono::NaiveDate;
use std::fmt::Write;

/// A fixed marketing or landing page listed in the sitemap.
#[derive(Debug, Clone, Copy)]
pub struct StaticPage {
    pub loc: &'static str,
    pub priority: &'static str,
    pub changefreq: &'static str,
}

const fn page(loc: &'static str, priority: &'static str, changefreq: &'static str) -> StaticPage {
    StaticPage {
        loc,
        priority,
        changefreq,
    }
}

pub const STATIC_PAGES: [StaticPage; 15] = [
    page("/", "1.0", "daily"),
    page("/about", "0.8", "monthly"),
    page("/contact", "0.6", "monthly"),
    page("/articles", "0.9", "daily"),
    page("/newsletter", "0.7", "monthly"),
    page("/faq", "0.5", "monthly"),
    page("/privacy-policy", "0.3", "yearly"),
    page("/terms-of-service", "0.3", "yearly"),
    page("/wellness", "0.8", "weekly"),
    page("/nutrition", "0.8", "weekly"),
    page("/fitness", "0.8", "weekly"),
    page("/mental-health", "0.8", "weekly"),
    page("/sleep", "0.8", "weekly"),
    page("/beauty", "0.8", "weekly"),
    page("/lifestyle", "0.8", "weekly"),
];

pub const SITEMAP_CACHE_CONTROL: &str = "public, max-age=3600";
pub const ROBOTS_CACHE_CONTROL: &str = "public, max-age=86400";

fn push_url(xml: &mut String, loc: &str, lastmod: NaiveDate, changefreq: &str, priority: &str) {
    // Writing into a String cannot fail.
    let _ = write!(
        xml,
        "  <url>\n    <loc>{}</loc>\n    <lastmod>{}</lastmod>\n    <changefreq>{}</changefreq>\n    <priority>{}</priority>\n  </url>\n",
        escape_html(loc),
        lastmod.format("%Y-%m-%d"),
        changefreq,
        priority
    );
}

/// render_sitemap
///
/// Static pages first, then published posts in the order given (newest first), then
/// category landing pages. A post's lastmod is its last update, falling back to its
/// publication date and finally to `today`.
pub fn render_sitemap(
    site_url: &str,
    posts: &[SitemapPost],
    category_slugs: &[String],
    today: NaiveDate,
) -> String {
    let site_url = site_url.trim_end_matches('/');
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\"\n        \
         xmlns:news=\"http://www.google.com/schemas/sitemap-news/0.9\"\n        \
         xmlns:image=\"http://www.google.com/schemas/sitemap-image/1.1\">\n",
    );

    for page in STATIC_PAGES.iter() {
        push_url(
            &mut xml,
            &format!("{}{}", site_url, page.loc),
            today,
            page.changefreq,
            page.priority,
        );
    }

    for post in posts {
        let lastmod = post
            .updated_at
            .or(post.published_at)
            .map(|ts| ts.date_naive())
            .unwrap_or(today);
        push_url(
            &mut xml,
            &format!("{}/blog/{}", site_url, post.slug),
            lastmod,
            "weekly",
            "0.7",
        );
    }

    for slug in category_slugs {
        push_url(
            &mut xml,
            &format!("{}/category/{}", site_url, slug),
            today,
            "weekly",
            "0.6",
        );
    }

    xml.push_str("</urlset>");
    xml
}

/// render_robots
///
/// Crawl policy: public content open, admin/auth/api closed, query strings disallowed except
/// blog pagination, SEO scrapers blocked, social preview bots allowed.
pub fn render_robots(site_url: &str) -> String {
    let site_url = site_url.trim_end_matches('/');
    format!(
        r#"# Robots.txt for Health Blog CMS
# Generated dynamically

User-agent: *
Allow: /
Allow: /blog/
Allow: /category/
Allow: /tag/
Allow: /about
Allow: /contact

# Disallow admin and private areas
Disallow: /admin
Disallow: /admin/
Disallow: /auth
Disallow: /api/
Disallow: /_next/
Disallow: /private/

# Disallow search result pages (prevent duplicate content)
Disallow: /*?*

# Allow important query parameters for pagination
Allow: /blog?page=

# Crawl-delay for polite crawling
Crawl-delay: 1

# Sitemaps
Sitemap: {site_url}/sitemap.xml

# Google specific
User-agent: Googlebot
Allow: /
Disallow: /admin
Disallow: /auth

# Bing specific
User-agent: Bingbot
Allow: /
Disallow: /admin
Disallow: /auth

# Block bad bots
User-agent: AhrefsBot
Disallow: /

User-agent: SemrushBot
Disallow: /

User-agent: MJ12bot
Disallow: /

# Allow social media crawlers for rich previews
User-agent: Twitterbot
Allow: /

User-agent: facebookexternalhit
Allow: /

User-agent: LinkedInBot
Allow: /
"#
    )
}
