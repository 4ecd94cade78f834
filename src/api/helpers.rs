use poem::Request;

/// Client metadata captured for refresh-token rows and audit events.
///
/// Prefers the first `X-Forwarded-For` hop (the service normally sits
/// behind a proxy), falling back to the socket address.
pub fn client_ip(req: &Request) -> Option<String> {
    if let Some(forwarded) = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
    {
        if let Some(first) = forwarded.split(',').next() {
            let trimmed = first.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
    }

    Some(req.remote_addr().to_string())
}

pub fn user_agent(req: &Request) -> Option<String> {
    req.headers()
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_ip_prefers_first_forwarded_hop() {
        let req = Request::builder()
            .header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
            .finish();

        assert_eq!(client_ip(&req).as_deref(), Some("203.0.113.7"));
    }

    #[test]
    fn test_user_agent_read_from_header() {
        let req = Request::builder()
            .header("user-agent", "medboard-app/1.2")
            .finish();

        assert_eq!(user_agent(&req).as_deref(), Some("medboard-app/1.2"));
    }

    #[test]
    fn test_user_agent_absent() {
        let req = Request::builder().finish();
        assert!(user_agent(&req).is_none());
    }
}
