// ABOUTME: Syndication module (sy:) hinting how often a channel is refreshed.
// ABOUTME: updatePeriod defaults to daily, updateFrequency to 1 and must be at least 1.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::builder::{skip_unknown, FieldTracker};
use crate::cursor::{Cursor, StartTag};
use crate::decode;
use crate::error::{Result, RssError};
use crate::modules::{Module, ModuleBuilder};
use crate::time_parse::DateParser;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdatePeriod {
    Hourly,
    #[default]
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl FromStr for UpdatePeriod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hourly" => Ok(UpdatePeriod::Hourly),
            "daily" => Ok(UpdatePeriod::Daily),
            "weekly" => Ok(UpdatePeriod::Weekly),
            "monthly" => Ok(UpdatePeriod::Monthly),
            "yearly" => Ok(UpdatePeriod::Yearly),
            _ => Err("expected hourly, daily, weekly, monthly or yearly".to_string()),
        }
    }
}

impl fmt::Display for UpdatePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UpdatePeriod::Hourly => "hourly",
            UpdatePeriod::Daily => "daily",
            UpdatePeriod::Weekly => "weekly",
            UpdatePeriod::Monthly => "monthly",
            UpdatePeriod::Yearly => "yearly",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Syndication {
    period: UpdatePeriod,
    frequency: u32,
    base: Option<DateTime<Utc>>,
}

impl Syndication {
    pub fn period(&self) -> UpdatePeriod {
        self.period
    }

    /// Number of updates per period, at least 1.
    pub fn frequency(&self) -> u32 {
        self.frequency
    }

    /// Reference instant the period and frequency are counted from.
    pub fn base(&self) -> Option<DateTime<Utc>> {
        self.base
    }
}

struct SyndicationBuilder {
    dates: DateParser,
    fields: FieldTracker,
    period: Option<UpdatePeriod>,
    frequency: Option<i64>,
    base: Option<DateTime<Utc>>,
}

pub(crate) fn factory(dates: &DateParser) -> Box<dyn ModuleBuilder> {
    Box::new(SyndicationBuilder {
        dates: dates.clone(),
        fields: FieldTracker::new("syndication"),
        period: None,
        frequency: None,
        base: None,
    })
}

impl ModuleBuilder for SyndicationBuilder {
    fn consume(&mut self, cursor: &mut Cursor<'_>, element: &StartTag) -> Result<()> {
        let name = element.local_name();
        match name {
            "updatePeriod" | "updateFrequency" | "updateBase" => self.fields.claim(name)?,
            _ => return skip_unknown(cursor, "syndication", element),
        }
        let text = cursor.read_text(element)?;
        match name {
            "updatePeriod" => self.period = Some(decode::enumeration("sy:updatePeriod", &text)?),
            "updateFrequency" => self.frequency = Some(decode::integer("sy:updateFrequency", &text)?),
            _ => self.base = self.dates.decode("sy:updateBase", &text)?,
        }
        Ok(())
    }

    fn finish(self: Box<Self>) -> Result<Module> {
        let frequency = self.frequency.unwrap_or(1);
        let frequency = u32::try_from(frequency)
            .ok()
            .filter(|f| *f >= 1)
            .ok_or_else(|| {
                RssError::invariant(
                    "syndication",
                    format!("updateFrequency must be at least 1, got {frequency}"),
                )
            })?;
        Ok(Module::Syndication(Syndication {
            period: self.period.unwrap_or_default(),
            frequency,
            base: self.base,
        }))
    }
}
