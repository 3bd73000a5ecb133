// ABOUTME: Cloud entity: the rssCloud push-subscription endpoint of a channel.
// ABOUTME: All five attributes are required; xml-rpc needs a non-empty registerProcedure.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::builder::ElementBuilder;
use crate::cursor::{Cursor, StartTag};
use crate::decode;
use crate::error::{Result, RssError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CloudProtocol {
    XmlRpc,
    Soap,
    HttpPost,
}

impl FromStr for CloudProtocol {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "xml-rpc" => Ok(CloudProtocol::XmlRpc),
            "soap" => Ok(CloudProtocol::Soap),
            "http-post" => Ok(CloudProtocol::HttpPost),
            _ => Err("expected xml-rpc, soap or http-post".to_string()),
        }
    }
}

impl fmt::Display for CloudProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CloudProtocol::XmlRpc => "xml-rpc",
            CloudProtocol::Soap => "soap",
            CloudProtocol::HttpPost => "http-post",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cloud {
    domain: String,
    port: u16,
    path: String,
    register_procedure: String,
    protocol: CloudProtocol,
}

impl Cloud {
    /// Fails when `protocol` is xml-rpc and `register_procedure` is empty.
    pub fn new(
        domain: impl Into<String>,
        port: u16,
        path: impl Into<String>,
        register_procedure: impl Into<String>,
        protocol: CloudProtocol,
    ) -> Result<Self> {
        let register_procedure = register_procedure.into();
        if protocol == CloudProtocol::XmlRpc && register_procedure.trim().is_empty() {
            return Err(RssError::invariant(
                "cloud",
                "registerProcedure is required for xml-rpc",
            ));
        }
        Ok(Self {
            domain: domain.into(),
            port,
            path: path.into(),
            register_procedure,
            protocol,
        })
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn register_procedure(&self) -> &str {
        &self.register_procedure
    }

    pub fn protocol(&self) -> CloudProtocol {
        self.protocol
    }
}

#[derive(Debug, Default)]
pub(crate) struct CloudBuilder {
    domain: Option<String>,
    port: Option<i64>,
    path: Option<String>,
    register_procedure: Option<String>,
    protocol: Option<CloudProtocol>,
}

impl ElementBuilder for CloudBuilder {
    type Output = Cloud;
    const ELEMENT: &'static str = "cloud";

    fn open(&mut self, start: &StartTag) -> Result<()> {
        self.domain = start.attr("domain").map(|d| d.trim().to_string());
        self.port = start
            .attr("port")
            .map(|p| decode::integer("cloud@port", p))
            .transpose()?;
        self.path = start
            .attr("path")
            .map(|p| decode::path("cloud@path", p))
            .transpose()?;
        self.register_procedure = start
            .attr("registerProcedure")
            .map(|p| p.trim().to_string());
        self.protocol = start
            .attr("protocol")
            .map(|p| decode::enumeration("cloud@protocol", p))
            .transpose()?;
        Ok(())
    }

    fn consume(&mut self, cursor: &mut Cursor<'_>, start: &StartTag) -> Result<()> {
        cursor.skip_element(start)?;
        self.open(start)
    }

    fn finish(self) -> Result<Cloud> {
        let domain = self
            .domain
            .filter(|d| !d.is_empty())
            .ok_or_else(|| RssError::missing_field("cloud", "domain"))?;
        let port = self
            .port
            .ok_or_else(|| RssError::missing_field("cloud", "port"))?;
        let port = u16::try_from(port).map_err(|_| {
            RssError::invariant("cloud", format!("port {port} is outside 0..=65535"))
        })?;
        let path = self
            .path
            .ok_or_else(|| RssError::missing_field("cloud", "path"))?;
        let register_procedure = self
            .register_procedure
            .ok_or_else(|| RssError::missing_field("cloud", "registerProcedure"))?;
        let protocol = self
            .protocol
            .ok_or_else(|| RssError::missing_field("cloud", "protocol"))?;
        Cloud::new(domain, port, path, register_procedure, protocol)
    }
}
