use clap::Parser;
use url::Url;
use crate::{
    dns::dnsimple::{PRODUCTION_URL, SANDBOX_URL},
    ip::http::DEFAULT_URL,
    updater::Mode,
};

/// Point a DNSimple A record at this machine's public IP address.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Settings {
    /// DNSimple API token
    #[arg(short = 't', long)]
    pub api_token: String,

    /// Instead of setting the IP, list the records of the domain
    #[arg(long)]
    pub list_records: bool,

    /// Subdomain whose IP to set. Created if it does not exist
    #[arg(short, long)]
    pub subdomain: String,

    /// The top level domain the subdomain belongs to
    #[arg(short, long)]
    pub domain: String,

    /// DNSimple account id, looked up from the token when omitted
    #[arg(long)]
    pub account: Option<String>,

    /// Use the DNSimple sandbox environment
    #[arg(long)]
    pub sandbox: bool,

    /// DNSimple API base URL, takes precedence over --sandbox
    #[arg(long)]
    pub api_url: Option<Url>,

    /// Service answering with the caller's IP address as plain text
    #[arg(long, default_value = DEFAULT_URL)]
    pub ip_url: Url,

    /// Log diagnostics as JSON
    #[arg(long)]
    pub json_logs: bool,
}

impl Settings {
    pub fn api_base(&self) -> Result<Url, url::ParseError> {
        match &self.api_url {
            Some(url) => Ok(url.clone()),
            None if self.sandbox => Url::parse(SANDBOX_URL),
            None => Url::parse(PRODUCTION_URL),
        }
    }

    pub fn mode(&self) -> Mode {
        if self.list_records {
            Mode::List
        } else {
            Mode::Set { subdomain: self.subdomain.clone() }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Settings, clap::Error> {
        Settings::try_parse_from(std::iter::once("dnsimple-ddns").chain(args.iter().copied()))
    }

    #[test]
    fn short_options() {
        let cfg = parse(&["-t", "tok", "-s", "home", "-d", "example.com"]).unwrap();
        assert_eq!(cfg.api_token, "tok");
        assert_eq!(cfg.subdomain, "home");
        assert_eq!(cfg.domain, "example.com");
        assert!(!cfg.list_records);
        assert_eq!(cfg.mode(), Mode::Set { subdomain: "home".to_owned() });
        assert_eq!(cfg.ip_url.as_str(), "https://api.ipify.org/");
        assert_eq!(cfg.api_base().unwrap().as_str(), PRODUCTION_URL);
    }

    #[test]
    fn list_records_flag() {
        let cfg = parse(&[
            "--api-token", "tok", "--subdomain", "home", "--domain", "example.com", "--list-records",
        ]).unwrap();
        assert_eq!(cfg.mode(), Mode::List);
    }

    #[test]
    fn required_options() {
        assert!(parse(&["-s", "home", "-d", "example.com"]).is_err());
        assert!(parse(&["-t", "tok", "-d", "example.com"]).is_err());
        assert!(parse(&["-t", "tok", "-s", "home"]).is_err());
    }

    #[test]
    fn no_positional_arguments() {
        assert!(parse(&["-t", "tok", "-s", "home", "-d", "example.com", "extra"]).is_err());
    }

    #[test]
    fn api_base_selection() {
        let cfg = parse(&["-t", "tok", "-s", "home", "-d", "example.com", "--sandbox"]).unwrap();
        assert_eq!(cfg.api_base().unwrap().as_str(), SANDBOX_URL);

        let cfg = parse(&[
            "-t", "tok", "-s", "home", "-d", "example.com",
            "--sandbox", "--api-url", "http://localhost:8080/v2/",
        ]).unwrap();
        assert_eq!(cfg.api_base().unwrap().as_str(), "http://localhost:8080/v2/");
    }

    #[test]
    fn bad_urls_are_rejected() {
        assert!(parse(&["-t", "tok", "-s", "home", "-d", "example.com", "--ip-url", "not a url"]).is_err());
    }

    #[test]
    fn command_is_well_formed() {
        use clap::CommandFactory;
        Settings::command().debug_assert();
    }
}
