// ABOUTME: Integration tests for whole-document parsing through the public API.
// ABOUTME: Covers required fields, write-once tags, dates, images, clouds, and structural failures.

use std::io::{self, BufReader, Read};

use feedtree_rss::{parse, CloudProtocol, Day, ErrorKind, Parser, Version};
use pretty_assertions::assert_eq;

fn doc(channel_body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
    <channel>
        <title>Tech Blog</title>
        <link>https://example.com/</link>
        <description>A tech blog about programming</description>
        {channel_body}
    </channel>
</rss>"#
    )
}

#[test]
fn test_end_to_end_two_items_in_order() {
    let rss = doc(
        r#"<language>en-us</language>
        <pubDate>Sat, 12 Oct 2013 18:50:26 UTC</pubDate>
        <item>
            <title>First Article</title>
            <link>https://example.com/post1</link>
            <guid>https://example.com/post1</guid>
            <pubDate>Mon, 15 Jan 2024 10:00:00 +0000</pubDate>
        </item>
        <item>
            <title>Second Article</title>
            <description>Summary of the second article.</description>
        </item>"#,
    );

    let document = parse(rss.as_bytes()).unwrap();
    assert_eq!(document.version(), Version::V2_0);
    assert_eq!(document.encoding(), "UTF-8");

    let channel = document.channel();
    assert_eq!(channel.title(), "Tech Blog");
    assert_eq!(channel.language(), Some("en-us"));

    let titles: Vec<_> = channel.items().iter().map(|i| i.title()).collect();
    assert_eq!(titles, vec![Some("First Article"), Some("Second Article")]);

    let first = &channel.items()[0];
    assert_eq!(
        first.guid().unwrap().to_url().unwrap().as_str(),
        "https://example.com/post1"
    );
    assert_eq!(
        first.pub_date().unwrap().to_rfc3339(),
        "2024-01-15T10:00:00+00:00"
    );
}

#[test]
fn test_channel_without_required_field_fails() {
    let rss = r#"<rss version="2.0"><channel>
        <title>Tech Blog</title>
        <description>No link here</description>
    </channel></rss>"#;
    let err = parse(rss.as_bytes()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Invariant);
}

#[test]
fn test_duplicate_channel_title_fails() {
    let err = parse(doc("<title>Second title</title>").as_bytes()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DuplicateField);
}

#[test]
fn test_item_needs_title_or_description() {
    let err = parse(doc("<item><link>https://example.com/a</link></item>").as_bytes()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Invariant);
}

#[test]
fn test_two_categories_in_one_item() {
    let rss = doc(
        r#"<item>
            <title>Tagged</title>
            <category>Rust</category>
            <category domain="https://example.com/topics">Parsing</category>
        </item>"#,
    );
    let document = parse(rss.as_bytes()).unwrap();
    let item = &document.channel().items()[0];
    assert_eq!(item.categories().len(), 2);
    let domains: Vec<_> = item.categories().iter().map(|c| c.domain()).collect();
    assert_eq!(domains, vec![None, Some("https://example.com/topics")]);
}

#[test]
fn test_skip_hours_and_days() {
    let rss = doc(
        r#"<skipHours><hour>24</hour><hour>23</hour></skipHours>
        <skipDays><day>Sunday</day></skipDays>"#,
    );
    let document = parse(rss.as_bytes()).unwrap();
    let channel = document.channel();
    assert_eq!(
        channel.skip_hours().iter().copied().collect::<Vec<_>>(),
        vec![0, 23]
    );
    assert!(channel.skip_days().contains(&Day::Sunday));

    let err = parse(doc("<skipHours><hour>25</hour></skipHours>").as_bytes()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Invariant);
}

#[test]
fn test_date_formats_agree() {
    let variants = [
        "Sat, 12 Oct 2013 18:50:26 UTC",
        "2013-10-12T18:50:26Z",
        "Sat,  12 Oct 2013\n   18:50:26   UTC",
    ];
    let parsed: Vec<_> = variants
        .iter()
        .map(|date| {
            let rss = doc(&format!("<lastBuildDate>{date}</lastBuildDate>"));
            parse(rss.as_bytes()).unwrap().channel().last_build_date()
        })
        .collect();
    assert!(parsed[0].is_some());
    assert_eq!(parsed[0], parsed[1]);
    assert_eq!(parsed[0], parsed[2]);
}

#[test]
fn test_blank_date_is_absent() {
    let document = parse(doc("<pubDate>   </pubDate>").as_bytes()).unwrap();
    assert_eq!(document.channel().pub_date(), None);
}

#[test]
fn test_unparseable_date_is_decode_error_unless_lenient() {
    let rss = doc("<pubDate>the day before yesterday</pubDate>");
    let err = parse(rss.as_bytes()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Decode);

    let parser = Parser::builder().lenient_dates(true).build();
    let document = parser.parse_str(&rss).unwrap();
    assert_eq!(document.channel().pub_date(), None);
}

#[test]
fn test_custom_date_format() {
    let rss = doc("<pubDate>12/10/2013 18:50</pubDate>");
    let parser = Parser::builder().date_format("%d/%m/%Y %H:%M").build();
    let document = parser.parse_str(&rss).unwrap();
    assert_eq!(
        document.channel().pub_date().unwrap().to_rfc3339(),
        "2013-10-12T18:50:00+00:00"
    );
}

#[test]
fn test_image_defaults_and_negative_size() {
    let image = r#"<image>
            <url>https://example.com/logo.png</url>
            <title>Tech Blog</title>
            <link>https://example.com/</link>
        </image>"#;
    let document = parse(doc(image).as_bytes()).unwrap();
    let image = document.channel().image().unwrap();
    assert_eq!((image.width(), image.height()), (88, 31));

    let negative = r#"<image>
            <url>https://example.com/logo.png</url>
            <title>Tech Blog</title>
            <link>https://example.com/</link>
            <width>-88</width>
        </image>"#;
    let err = parse(doc(negative).as_bytes()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Invariant);
}

#[test]
fn test_cloud_procedure_rules() {
    let xml_rpc = r#"<cloud domain="rpc.example.com" port="80" path="/RPC2"
        registerProcedure="" protocol="xml-rpc"/>"#;
    let err = parse(doc(xml_rpc).as_bytes()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Invariant);

    let http_post = r#"<cloud domain="rpc.example.com" port="80" path="/notify"
        registerProcedure="" protocol="http-post"/>"#;
    let document = parse(doc(http_post).as_bytes()).unwrap();
    let cloud = document.channel().cloud().unwrap();
    assert_eq!(cloud.protocol(), CloudProtocol::HttpPost);
    assert_eq!(cloud.port(), 80);
}

#[test]
fn test_missing_rss_root() {
    let err = parse(r#"<feed xmlns="http://www.w3.org/2005/Atom"></feed>"#.as_bytes()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Structural);
    assert_eq!(err.to_string(), "<rss> not found");

    let err = parse("".as_bytes()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Structural);
}

#[test]
fn test_missing_channel() {
    let err = parse(r#"<rss version="2.0"><item><title>x</title></item></rss>"#.as_bytes())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Structural);
    assert_eq!(err.to_string(), "<channel> not found");

    let err = parse(r#"<rss version="2.0"></rss>"#.as_bytes()).unwrap_err();
    assert_eq!(err.to_string(), "<channel> not found");
}

#[test]
fn test_missing_or_unknown_version() {
    let err = parse(r#"<rss><channel/></rss>"#.as_bytes()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Invariant);

    let err = parse(r#"<rss version="3.0"><channel/></rss>"#.as_bytes()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Decode);
}

#[test]
fn test_version_alias_and_old_versions() {
    let body = "<channel><title>t</title><link>https://example.com/</link>\
        <description>d</description></channel>";
    let document = parse(format!(r#"<rss version="2">{body}</rss>"#).as_bytes()).unwrap();
    assert_eq!(document.version(), Version::V2_0);
    let document = parse(format!(r#"<rss version="0.92">{body}</rss>"#).as_bytes()).unwrap();
    assert_eq!(document.version(), Version::V0_92);
}

#[test]
fn test_truncated_input_fails() {
    let rss = doc("");
    let truncated = &rss[..rss.find("</channel>").unwrap()];
    let err = parse(truncated.as_bytes()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Structural);
}

#[test]
fn test_second_channel_is_ignored() {
    let rss = r#"<rss version="2.0">
        <channel><title>One</title><link>https://one.example/</link><description>1</description></channel>
        <channel><title>Two</title><link>https://two.example/</link><description>2</description></channel>
    </rss>"#;
    let document = parse(rss.as_bytes()).unwrap();
    assert_eq!(document.channel().title(), "One");
}

#[test]
fn test_declared_encoding_is_reported() {
    let rss = r#"<?xml version="1.0" encoding="iso-8859-1"?>
<rss version="2.0"><channel><title>Caf&#233;</title><link>https://example.com/</link>
<description>d</description></channel></rss>"#;
    let document = parse(rss.as_bytes()).unwrap();
    assert_eq!(document.encoding(), "windows-1252");
    assert_eq!(document.channel().title(), "Café");
}

#[test]
fn test_entities_and_cdata_in_text() {
    let rss = doc(
        r#"<item>
            <title>Fish &amp; Chips</title>
            <description><![CDATA[<p>Hello</p>]]></description>
        </item>"#,
    );
    let document = parse(rss.as_bytes()).unwrap();
    let item = &document.channel().items()[0];
    assert_eq!(item.title(), Some("Fish & Chips"));
    assert_eq!(item.description(), Some("<p>Hello</p>"));
}

#[test]
fn test_document_serializes() {
    let document = parse(doc("<ttl>60</ttl>").as_bytes()).unwrap();
    let json = serde_json::to_value(&document).unwrap();
    assert_eq!(json["version"], "2.0");
    assert_eq!(json["channel"]["ttl"], 60);
    assert_eq!(json["channel"]["link"], "https://example.com/");
}

#[test]
fn test_channel_outlives_document() {
    let channel = parse(doc("<item><title>Kept</title></item>").as_bytes())
        .unwrap()
        .into_channel();
    assert_eq!(channel.items()[0].title(), Some("Kept"));
}

/// Serves `prefix`, then fails every later read.
struct FailingReader {
    prefix: &'static [u8],
}

impl Read for FailingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.prefix.is_empty() {
            return Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset"));
        }
        let n = self.prefix.len().min(buf.len());
        buf[..n].copy_from_slice(&self.prefix[..n]);
        self.prefix = &self.prefix[n..];
        Ok(n)
    }
}

#[test]
fn test_read_failure_is_io_error() {
    let reader = BufReader::new(FailingReader {
        prefix: b"<rss version=\"2.0\"><channel><title>Cut",
    });
    let err = parse(reader).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
    assert_eq!(err.to_string(), "read failed: reset");
}
