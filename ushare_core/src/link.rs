//! Shareable link shown at startup

use crate::ShareMode;
use crate::error::ShareError;
use qrcode::QrCode;
use qrcode::render::unicode;
use std::fmt;
use std::io::Write;
use std::net::IpAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareLink {
    pub host: IpAddr,
    pub port: u16,
    pub mode: ShareMode,
}

impl ShareLink {
    pub fn new(host: IpAddr, port: u16, mode: ShareMode) -> Self {
        Self { host, port, mode }
    }

    pub fn url(&self) -> String {
        self.to_string()
    }

    /// Render the URL as terminal QR art (light modules on a dark terminal)
    pub fn render_qr(&self) -> Result<String, ShareError> {
        let code = QrCode::new(self.url().as_bytes())?;
        Ok(code
            .render::<unicode::Dense1x2>()
            .dark_color(unicode::Dense1x2::Light)
            .light_color(unicode::Dense1x2::Dark)
            .build())
    }

    /// Print the QR code followed by the plain link
    pub fn publish(&self, out: &mut impl Write) -> Result<(), ShareError> {
        let qr = self.render_qr()?;
        writeln!(out, "{}", qr)?;
        writeln!(out, "Link: {}", self)?;
        out.flush()?;
        Ok(())
    }
}

impl fmt::Display for ShareLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "http://{}:{}/{}", self.host, self.port, self.mode)
    }
}
