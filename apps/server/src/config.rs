use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use clap::Parser;
use transcript_gateway_core::{
    ProxyConfig,
    proxy::{DEFAULT_PROXY_URL, PROXY_PASSWORD_ENV, PROXY_URL_ENV, PROXY_USERNAME_ENV},
};

pub const DEFAULT_PORT: u16 = 8080;

#[derive(Parser, Debug)]
#[command(name = "transcript-gateway")]
#[command(about = "Serve YouTube transcript languages and text as JSON over HTTP")]
pub struct Cli {
    /// Address to bind
    #[arg(long, env = "GATEWAY_HOST", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(short, long, env = "GATEWAY_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Webshare proxy username. Both username and password enable the proxy.
    #[arg(long, env = PROXY_USERNAME_ENV)]
    pub proxy_username: Option<String>,

    /// Webshare proxy password
    #[arg(long, env = PROXY_PASSWORD_ENV, hide_env_values = true)]
    pub proxy_password: Option<String>,

    /// Proxy endpoint used when credentials are set
    #[arg(long, env = PROXY_URL_ENV, default_value = DEFAULT_PROXY_URL)]
    pub proxy_url: String,
}

impl Cli {
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn proxy(&self) -> ProxyConfig {
        ProxyConfig::from_credentials(
            self.proxy_username.clone(),
            self.proxy_password.clone(),
            Some(self.proxy_url.clone()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_bind_all_interfaces_on_8080() {
        let cli = Cli::try_parse_from(["transcript-gateway"]).unwrap();
        assert_eq!(cli.port, 8080);
        assert!(cli.host.is_unspecified());
    }

    #[test]
    fn both_credentials_enable_proxy() {
        let cli = Cli::try_parse_from([
            "transcript-gateway",
            "--proxy-username",
            "user",
            "--proxy-password",
            "secret",
        ])
        .unwrap();
        assert_eq!(
            cli.proxy(),
            ProxyConfig::Webshare {
                url: DEFAULT_PROXY_URL.to_string(),
                username: "user".into(),
                password: "secret".into(),
            }
        );
    }

    #[test]
    fn username_alone_stays_direct() {
        let cli =
            Cli::try_parse_from(["transcript-gateway", "--proxy-username", "user"]).unwrap();
        assert_eq!(cli.proxy(), ProxyConfig::Direct);
    }
}
