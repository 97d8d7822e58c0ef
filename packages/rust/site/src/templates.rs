//! Fixed page templates.
//!
//! Every function here is a pure projection of records and site identity to
//! a string. Dates in output always come from the record, never the clock,
//! so identical input yields byte-identical pages.

use pulldown_cmark::{Options, Parser, html};

use pressmill_shared::{AffiliateRule, Record, SiteConfig};

/// Escape the five HTML metacharacters for text and attribute positions.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render a markdown body to HTML.
pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(markdown, options);
    let mut out = String::with_capacity(markdown.len() * 2);
    html::push_html(&mut out, parser);
    out
}

fn nav(prefix: &str, site: &SiteConfig) -> String {
    format!(
        r#"<header>
    <nav>
        <a href="{prefix}index.html" class="logo">{title}</a>
        <ul>
            <li><a href="{prefix}index.html">Home</a></li>
            <li><a href="{prefix}about.html">About</a></li>
            <li><a href="{prefix}disclaimer.html">Top Tools</a></li>
        </ul>
    </nav>
</header>"#,
        title = escape_html(&site.title),
    )
}

fn footer(prefix: &str, site: &SiteConfig) -> String {
    format!(
        r#"<footer class="site-footer">
    <div class="footer-content">
        <p>&copy; {title}. All rights reserved.</p>
        <p><small>Some links on this site are affiliate links. We may earn a small commission at no extra cost to you.</small></p>
        <nav>
            <a href="{prefix}about.html">About</a> |
            <a href="{prefix}privacy.html">Privacy Policy</a> |
            <a href="{prefix}disclaimer.html">Affiliate Disclaimer</a> |
            <a href="{prefix}sitemap.xml">Sitemap</a>
        </nav>
    </div>
</footer>"#,
        title = escape_html(&site.title),
    )
}

fn sidebar(rules: &[AffiliateRule]) -> String {
    let items: String = rules
        .iter()
        .take(4)
        .map(|r| {
            format!(
                r#"                <li><a href="{url}" target="_blank" rel="nofollow">{name}</a></li>
"#,
                url = escape_html(&r.url),
                name = escape_html(&r.name),
            )
        })
        .collect();

    format!(
        r#"<aside class="sidebar">
    <div class="sidebar-widget">
        <h3>Top AI Writing Tools</h3>
        <ul class="tool-list">
{items}        </ul>
    </div>
</aside>"#
    )
}

/// One article page. `body_html` is the already-rendered markdown body with
/// affiliate links applied.
pub fn render_article(
    record: &Record,
    body_html: &str,
    site: &SiteConfig,
    rules: &[AffiliateRule],
) -> String {
    let title = escape_html(&record.title);
    let description = escape_html(&record.meta_description);
    let canonical = format!("{}/posts/{}.html", site.base_url, record.slug);
    let tags_html: String = record
        .tags
        .iter()
        .map(|t| format!(r#"<span class="tag">{}</span> "#, escape_html(t)))
        .collect();
    let keywords = escape_html(&record.tags.join(", "));

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} | {site_title}</title>
    <meta name="description" content="{description}">
    <meta name="keywords" content="{keywords}">
    <meta property="og:title" content="{title}">
    <meta property="og:description" content="{description}">
    <meta property="og:type" content="article">
    <meta property="og:url" content="{canonical}">
    <link rel="canonical" href="{canonical}">
    <link rel="stylesheet" href="../static/css/style.css">
</head>
<body>
{nav}
<main class="article-container">
    <article>
        <header class="article-header">
            <div class="article-meta">
                <span class="category">{category}</span>
                <span class="date">{date}</span>
                <span class="read-time">{read_time} min read</span>
            </div>
            <h1>{title}</h1>
            <p class="article-description">{description}</p>
            <div class="tags">{tags_html}</div>
        </header>
        <div class="article-content">
{body_html}
        </div>
        <footer class="article-footer">
            <div class="author-bio">
                <h3>About {author}</h3>
                <p>We test and review the latest AI tools to help freelancers and small businesses make informed decisions. Our reviews are honest, thorough, and based on real-world usage.</p>
            </div>
            <div class="tags">{tags_html}</div>
        </footer>
    </article>
{sidebar}
</main>
{footer}
<script src="../static/js/main.js"></script>
</body>
</html>"#,
        site_title = escape_html(&site.title),
        category = escape_html(&record.category),
        date = record.date,
        read_time = record.estimated_read_time,
        author = escape_html(&site.author),
        nav = nav("../", site),
        sidebar = sidebar(rules),
        footer = footer("../", site),
    )
}

fn post_card(record: &Record) -> String {
    let tags_preview: String = record
        .tags
        .iter()
        .take(3)
        .map(|t| format!(r#"<span class="tag-small">{}</span> "#, escape_html(t)))
        .collect();

    format!(
        r#"        <article class="post-card">
            <div class="post-card-content">
                <span class="post-category">{category}</span>
                <h2><a href="posts/{slug}.html">{title}</a></h2>
                <p class="post-excerpt">{description}</p>
                <div class="post-meta">
                    <span class="post-date">{date}</span>
                    <span class="post-read-time">{read_time} min</span>
                </div>
                <div class="post-tags">{tags_preview}</div>
                <a href="posts/{slug}.html" class="read-more">Read More</a>
            </div>
        </article>
"#,
        category = escape_html(&record.category),
        slug = record.slug,
        title = escape_html(&record.title),
        description = escape_html(&record.meta_description),
        date = record.date,
        read_time = record.estimated_read_time,
    )
}

fn tool_card(rule: &AffiliateRule) -> String {
    format!(
        r#"            <a href="{url}" target="_blank" rel="nofollow" class="tool-card">
                <h3>{name}</h3>
                <span class="cta-btn">Try Free</span>
            </a>
"#,
        url = escape_html(&rule.url),
        name = escape_html(&rule.name),
    )
}

/// Homepage listing the `max_posts` most recent records, in given order.
pub fn render_homepage(
    records: &[Record],
    site: &SiteConfig,
    rules: &[AffiliateRule],
    max_posts: usize,
) -> String {
    let cards: String = records.iter().take(max_posts).map(post_card).collect();
    let tools: String = rules.iter().take(4).map(tool_card).collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} - {tagline}</title>
    <meta name="description" content="{description}">
    <meta property="og:title" content="{title}">
    <meta property="og:description" content="{description}">
    <meta property="og:type" content="website">
    <link rel="canonical" href="{base_url}">
    <link rel="stylesheet" href="static/css/style.css">
</head>
<body>
{nav}
<section class="hero">
    <div class="hero-content">
        <h1>{title}</h1>
        <p>{tagline}</p>
        <p class="hero-sub">Helping freelancers and small businesses choose the right AI tools to save time and grow faster.</p>
    </div>
</section>
<main class="homepage-main">
    <section class="featured-tools">
        <h2>Top Recommended AI Tools</h2>
        <div class="tools-grid">
{tools}        </div>
    </section>
    <section class="latest-posts">
        <h2>Latest Articles</h2>
        <div class="posts-grid">
{cards}        </div>
    </section>
</main>
{footer}
<script src="static/js/main.js"></script>
</body>
</html>"#,
        title = escape_html(&site.title),
        tagline = escape_html(&site.tagline),
        description = escape_html(&site.description),
        base_url = site.base_url,
        nav = nav("", site),
        footer = footer("", site),
    )
}

/// Sitemap with the index URL plus one entry per record.
pub fn render_sitemap(records: &[Record], site: &SiteConfig) -> String {
    let mut out = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
    <url>
        <loc>{base_url}/index.html</loc>
        <changefreq>daily</changefreq>
        <priority>1.0</priority>
    </url>
"#,
        base_url = site.base_url,
    );

    for record in records {
        out.push_str(&format!(
            r#"    <url>
        <loc>{base_url}/posts/{slug}.html</loc>
        <lastmod>{date}</lastmod>
        <changefreq>monthly</changefreq>
        <priority>0.8</priority>
    </url>
"#,
            base_url = site.base_url,
            slug = record.slug,
            date = record.date,
        ));
    }

    out.push_str("</urlset>\n");
    out
}

pub fn render_robots(site: &SiteConfig) -> String {
    format!(
        "User-agent: *\nAllow: /\n\nSitemap: {}/sitemap.xml\n",
        site.base_url
    )
}

fn simple_page(site: &SiteConfig, page_title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{page_title} | {site_title}</title>
    <link rel="stylesheet" href="static/css/style.css">
</head>
<body>
{nav}
<main class="page-main">
{body}
</main>
{footer}
</body>
</html>"#,
        site_title = escape_html(&site.title),
        nav = nav("", site),
        footer = footer("", site),
    )
}

pub fn render_about(site: &SiteConfig) -> String {
    let title = escape_html(&site.title);
    let body = format!(
        r#"    <h1>About {title}</h1>
    <p>{title} is an independent blog dedicated to helping freelancers, content creators, and small business owners navigate the rapidly growing world of AI tools.</p>
    <h2>Our Mission</h2>
    <p>We test, review, and compare the best AI tools on the market so you don't have to. Our goal is to save you time and money by providing honest, thorough, and practical reviews.</p>
    <h2>What We Cover</h2>
    <ul>
        <li>AI Writing Tools</li>
        <li>AI SEO Tools</li>
        <li>AI Productivity Tools</li>
        <li>AI Marketing Tools</li>
    </ul>
    <h2>Affiliate Disclosure</h2>
    <p>Some links on this site are affiliate links. If you click through and make a purchase, we may earn a small commission at no extra cost to you. See our full <a href="disclaimer.html">Affiliate Disclaimer</a>.</p>"#
    );
    simple_page(site, "About Us", &body)
}

pub fn render_privacy(site: &SiteConfig) -> String {
    let body = r#"    <h1>Privacy Policy</h1>
    <h2>Information We Collect</h2>
    <p>We collect anonymous usage data to improve our content. We do not collect personally identifiable information.</p>
    <h2>Cookies</h2>
    <p>We use cookies for analytics purposes only. You can disable cookies in your browser settings.</p>
    <h2>Third-Party Links</h2>
    <p>Our site contains links to third-party websites. We are not responsible for their privacy practices.</p>
    <h2>Contact</h2>
    <p>If you have questions about this privacy policy, please contact us through our website.</p>"#;
    simple_page(site, "Privacy Policy", body)
}

pub fn render_disclaimer(site: &SiteConfig) -> String {
    let title = escape_html(&site.title);
    let body = format!(
        r#"    <h1>Affiliate Disclaimer</h1>
    <p>{title} participates in affiliate marketing programs. This means that when you click on certain links on our site and make a purchase, we may earn a commission.</p>
    <h2>Our Commitment</h2>
    <p>Our affiliate relationships do not influence our reviews or recommendations. We only recommend products and services we genuinely believe are valuable to our readers.</p>
    <p>Affiliate commissions help us keep this site running and producing free, high-quality content for our readers. Thank you for your support!</p>"#
    );
    simple_page(site, "Affiliate Disclaimer", &body)
}
