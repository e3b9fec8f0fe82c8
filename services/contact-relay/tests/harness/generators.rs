// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Test data generators for abuse simulation.

use contact_relay::filter::Signal;
use serde_json::{json, Value};
use std::net::{IpAddr, Ipv4Addr};

/// Generate a pool of IP addresses for testing.
pub fn generate_ips(count: usize) -> Vec<IpAddr> {
    (0..count)
        .map(|i| {
            // Use 10.x.x.x private range
            let a = ((i >> 16) & 0xFF) as u8;
            let b = ((i >> 8) & 0xFF) as u8;
            let c = (i & 0xFF) as u8;
            IpAddr::V4(Ipv4Addr::new(10, a, b, c))
        })
        .collect()
}

/// A submission a person would plausibly send.
pub fn clean_submission(i: usize) -> Value {
    json!({
        "name": format!("Visitor {i}"),
        "email": format!("visitor{i}@mail.example"),
        "subject": "Project enquiry",
        "message": "Hi,\nI enjoyed your portfolio and would like to talk about a project.\nThanks!",
        "honeypot": ""
    })
}

/// Real browser user agents.
pub fn browser_agents() -> Vec<&'static str> {
    vec![
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36",
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_5) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.5 Safari/605.1.15",
        "Mozilla/5.0 (X11; Linux x86_64; rv:127.0) Gecko/20100101 Firefox/127.0",
        "Mozilla/5.0 (iPhone; CPU iPhone OS 17_5 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.5 Mobile/15E148 Safari/604.1",
        "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Mobile Safari/537.36",
    ]
}

/// User agents of automation tools the filter must flag.
pub fn automation_agents() -> Vec<&'static str> {
    vec![
        "Googlebot/2.1 (+http://www.google.com/bot.html)",
        "Mozilla/5.0 (compatible; bingbot/2.0)",
        "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) HeadlessChrome/126.0.0.0 Safari/537.36",
        "Scrapy/2.11 (+https://scrapy.org) crawler",
        "Spider-Monkey/1.0",
        "selenium/4.21.0 (python linux)",
        "Puppeteer/22.0",
        "Mozilla/5.0 (Linux; Android 11) Chrome-Lighthouse",
    ]
}

/// Messages that trip a message rule, with the rule they should trip.
pub fn spam_messages() -> Vec<(&'static str, Signal)> {
    vec![
        ("<script>alert(1)</script>", Signal::HtmlMarkup),
        ("Great post! <a href=\"x\">cheap meds</a>", Signal::HtmlMarkup),
        ("[url=http://spam.example]click[/url]", Signal::ForumMarkup),
        ("[URL=spam]loans[/URL]", Signal::ForumMarkup),
        ("Win big at our casino tonight", Signal::BlockedKeyword),
        ("Buy VIAGRA online", Signal::BlockedKeyword),
        ("Instant loan approval", Signal::BlockedKeyword),
        ("Invest in crypto now", Signal::BlockedKeyword),
        ("Check https://example.com/offer", Signal::RawUrl),
        ("Visit http://198.51.100.7/promo", Signal::RawUrl),
    ]
}

/// Email addresses the filter must flag.
pub fn suspicious_emails() -> Vec<(&'static str, Signal)> {
    vec![
        ("user20240619123@mail.example", Signal::DigitRun),
        ("12345678@mail.example", Signal::DigitRun),
        ("qz7xk2m9vb4np1lr8tw3@mail.example", Signal::RandomToken),
        ("aaaaaaaaaaaaaaaaaaaaaaaa@mail.example", Signal::RandomToken),
    ]
}

/// Messages that look spammy to a person but must pass the filter.
pub fn benign_lookalikes() -> Vec<&'static str> {
    vec![
        "I loaned my copy of your book to a colleague.",
        "My site is example.com if you want to look.",
        "Price was 3 < 5 in my head",
        "Cryptography talk was great",
        "Pokerface is my favourite song",
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_ips() {
        let ips = generate_ips(256);
        assert_eq!(ips.len(), 256);
        // All should be unique
        let unique: std::collections::HashSet<_> = ips.iter().collect();
        assert_eq!(unique.len(), 256);
    }

    #[test]
    fn test_clean_submissions_are_distinct() {
        assert_ne!(clean_submission(1), clean_submission(2));
        assert_eq!(clean_submission(1)["honeypot"], "");
    }
}
