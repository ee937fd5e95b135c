//! Web server command.

use console::style;

use folio::config::Settings;

/// Start the web server, with `bind` overriding the configured address.
pub async fn cmd_serve(settings: &mut Settings, bind: Option<&str>) -> anyhow::Result<()> {
    if let Some(bind) = bind {
        let (host, port) = parse_bind_address(bind, &settings.host, settings.port);
        settings.host = host;
        settings.port = port;
    }

    let document = settings.document_path();
    if document.is_file() {
        println!(
            "  {} Serving {}",
            style("✓").green(),
            document.display()
        );
    } else {
        eprintln!(
            "  {} Portfolio document missing: {}",
            style("✗").red(),
            document.display()
        );
    }

    println!(
        "{} Starting folio server at http://{}:{}",
        style("→").cyan(),
        settings.host,
        settings.port
    );
    println!("  Press Ctrl+C to stop");

    folio::server::serve(settings).await
}

/// Parse a bind address that can be:
/// - Just a port: "8080" -> default host, 8080
/// - Just a host: "127.0.0.1" -> 127.0.0.1, default port
/// - Host and port: "127.0.0.1:8080" -> 127.0.0.1:8080
fn parse_bind_address(bind: &str, default_host: &str, default_port: u16) -> (String, u16) {
    // Try parsing as just a port number
    if let Ok(port) = bind.parse::<u16>() {
        return (default_host.to_string(), port);
    }

    // Try parsing as host:port
    if let Some((host, port_str)) = bind.rsplit_once(':') {
        if let Ok(port) = port_str.parse::<u16>() {
            return (host.to_string(), port);
        }
    }

    // Must be just a host, use default port
    (bind.to_string(), default_port)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bind_port_only() {
        assert_eq!(
            parse_bind_address("8080", "0.0.0.0", 3000),
            ("0.0.0.0".to_string(), 8080)
        );
    }

    #[test]
    fn test_parse_bind_host_only() {
        assert_eq!(
            parse_bind_address("127.0.0.1", "0.0.0.0", 3000),
            ("127.0.0.1".to_string(), 3000)
        );
    }

    #[test]
    fn test_parse_bind_host_and_port() {
        assert_eq!(
            parse_bind_address("localhost:4000", "0.0.0.0", 3000),
            ("localhost".to_string(), 4000)
        );
    }
}
