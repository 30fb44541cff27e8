// src/ingest/providers/demo.rs
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};

use crate::article::Article;
use crate::ingest::types::NewsProvider;

/// How many demo articles are appended to a successful live fetch.
pub const DEMO_TOP_UP: usize = 4;

const DEMO: [(&str, &str, &str, &str); 6] = [
    (
        "Tata Steel expands Jamshedpur plant with new blast furnace capacity",
        "Tata Steel announces Rs 12,000 crore investment to expand Jamshedpur steel plant with new blast furnace, requiring significant fuel oil for operations. The company plans to increase capacity by 3 MTPA.",
        "Economic Times",
        "https://economictimes.com/tata-steel-expansion",
    ),
    (
        "Adani Ports to build LNG terminal at Mundra with captive power plant",
        "Adani Ports announces construction of new LNG terminal at Mundra port with 1000 MW captive power plant. The facility will require marine bunker fuel for vessel operations.",
        "Business Standard",
        "https://business-standard.com/adani-mundra",
    ),
    (
        "JSW Cement Salboni plant expansion includes new boiler units",
        "JSW Cement's Salboni facility in West Bengal to add new kiln and boiler units as part of capacity expansion to 10 MTPA. The project requires furnace oil supply contracts.",
        "Mint",
        "https://livemint.com/jsw-cement-expansion",
    ),
    (
        "Reliance Industries commissioning new refinery unit at Jamnagar",
        "Reliance Industries announces commissioning of aromatics complex at Jamnagar refinery. The petrochemical facility includes power generation and industrial heating systems.",
        "Economic Times",
        "https://economictimes.com/reliance-jamnagar",
    ),
    (
        "L&T to construct mega shipyard at Kattupalli with dry dock facilities",
        "Larsen & Toubro wins contract for mega shipyard development at Kattupalli, Chennai. The project includes marine bunker fuel storage and supply infrastructure.",
        "Hindu Business Line",
        "https://thehindubusinessline.com/lt-shipyard",
    ),
    (
        "Ultratech Cement Gulbarga plant to install captive gensets",
        "Ultratech Cement's Gulbarga unit in Karnataka installing 50 MW captive power gensets to reduce grid dependency. The facility requires high speed diesel supply.",
        "Economic Times",
        "https://economictimes.com/ultratech-gulbarga",
    ),
];

/// The built-in demo set, each article dated `now`.
pub fn demo_articles(now: DateTime<Utc>) -> Vec<Article> {
    let stamp = now.to_rfc3339_opts(SecondsFormat::Millis, true);
    DEMO.iter()
        .map(|(title, description, source, link)| {
            Article::new(*title, *description)
                .with_pub_date(stamp.clone())
                .with_source(*source)
                .with_link(*link)
        })
        .collect()
}

/// Offline provider serving [`demo_articles`]; handy for local runs and tests.
pub struct DemoProvider;

#[async_trait]
impl NewsProvider for DemoProvider {
    async fn fetch_latest(&self) -> Result<Vec<Article>> {
        Ok(demo_articles(Utc::now()))
    }

    fn name(&self) -> &'static str {
        "demo"
    }
}
