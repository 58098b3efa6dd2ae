use crate::types::ServerAddress;

/// Expands `${VAR}` and `~` inside an address; unresolvable references are kept verbatim.
pub(crate) fn expand_address(raw: &str) -> ServerAddress {
    let trimmed = raw.trim();
    let expanded = shellexpand::full(trimmed)
        .map(|cow| cow.into_owned())
        .unwrap_or_else(|_| trimmed.to_string());
    ServerAddress::new(expanded)
}

/// Parses a comma-separated address list, dropping blank entries.
pub fn parse_server_list(raw: &str) -> Vec<ServerAddress> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(expand_address)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    #[test]
    fn splits_and_trims_comma_separated_list() {
        let servers = parse_server_list(" http://a:8001/mcp , ,http://b:8002/sse,");
        let raw: Vec<&str> = servers.iter().map(ServerAddress::as_str).collect();
        assert_eq!(raw, vec!["http://a:8001/mcp", "http://b:8002/sse"]);
    }

    #[test]
    fn blank_list_yields_no_servers() {
        assert!(parse_server_list("  ,  ").is_empty());
        assert!(parse_server_list("").is_empty());
    }

    #[test]
    #[serial]
    fn expands_env_vars_in_addresses() {
        unsafe {
            env::set_var("TEST_MCP_HOST", "tools.local");
        }

        let address = expand_address("http://${TEST_MCP_HOST}:9000/mcp");
        assert_eq!(address.as_str(), "http://tools.local:9000/mcp");

        let untouched = expand_address("http://${TEST_MCP_UNSET_VAR}/mcp");
        assert_eq!(untouched.as_str(), "http://${TEST_MCP_UNSET_VAR}/mcp");

        unsafe {
            env::remove_var("TEST_MCP_HOST");
        }
    }
}
