use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters left alone by `encodeURIComponent`
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Device family, as far as `sms:` links care
///
/// Apple's messaging app only honours `sms:<number>&body=`; everyone else
/// expects `?body=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Platform {
    AppleMobile,
    #[default]
    Other,
}

impl Platform {
    /// Classify a browser from its user agent and touch-point count
    ///
    /// iPadOS reports a desktop `Macintosh` user agent, so it is told apart
    /// from a real Mac by having more than one touch point.
    pub fn detect(user_agent: &str, max_touch_points: u32) -> Self {
        let apple_device = ["iPad", "iPhone", "iPod"]
            .iter()
            .any(|name| user_agent.contains(name));
        let ipad_os = user_agent.contains("Macintosh") && max_touch_points > 1;

        if apple_device || ipad_os {
            Self::AppleMobile
        } else {
            Self::Other
        }
    }

    /// For callers that probe the capability instead of sniffing
    pub fn from_ampersand_support(supports_ampersand_body: bool) -> Self {
        if supports_ampersand_body {
            Self::AppleMobile
        } else {
            Self::Other
        }
    }

    pub fn sms_separator(self) -> char {
        match self {
            Self::AppleMobile => '&',
            Self::Other => '?',
        }
    }
}

pub fn tel_uri(phone: &str) -> String {
    format!("tel:+{}", phone)
}

/// `sms:` link, with the body pre-filled when one is given
///
/// An empty body produces the bare link.
pub fn sms_uri(phone: &str, body: Option<&str>, platform: Platform) -> String {
    match body.filter(|b| !b.is_empty()) {
        Some(body) => format!(
            "sms:+{}{}body={}",
            phone,
            platform.sms_separator(),
            encode_uri_component(body)
        ),
        None => format!("sms:+{}", phone),
    }
}

pub fn encode_uri_component(input: &str) -> String {
    utf8_percent_encode(input, URI_COMPONENT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const IPHONE_UA: &str =
        "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15";
    const MAC_UA: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15";
    const ANDROID_UA: &str = "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36";

    #[test]
    fn test_detect_platform() {
        assert_eq!(Platform::detect(IPHONE_UA, 5), Platform::AppleMobile);
        assert_eq!(Platform::detect("Mozilla/5.0 (iPad; CPU OS 12_0)", 0), Platform::AppleMobile);
        // iPadOS desktop-class UA
        assert_eq!(Platform::detect(MAC_UA, 5), Platform::AppleMobile);
        assert_eq!(Platform::detect(MAC_UA, 0), Platform::Other);
        assert_eq!(Platform::detect(ANDROID_UA, 5), Platform::Other);
        assert_eq!(Platform::detect("", 0), Platform::Other);
    }

    #[test]
    fn test_tel_uri() {
        assert_eq!(tel_uri("19165551234"), "tel:+19165551234");
    }

    #[test]
    fn test_sms_uri_separator() {
        assert_eq!(
            sms_uri("19165551234", Some("Hi there"), Platform::AppleMobile),
            "sms:+19165551234&body=Hi%20there"
        );
        assert_eq!(
            sms_uri("19165551234", Some("Hi there"), Platform::Other),
            "sms:+19165551234?body=Hi%20there"
        );
    }

    #[test]
    fn test_sms_uri_without_body() {
        assert_eq!(sms_uri("19165551234", None, Platform::AppleMobile), "sms:+19165551234");
        assert_eq!(sms_uri("19165551234", Some(""), Platform::Other), "sms:+19165551234");
    }

    #[test]
    fn test_encode_uri_component() {
        assert_eq!(
            encode_uri_component("Name: Jo & Al\n# of windows: 12"),
            "Name%3A%20Jo%20%26%20Al%0A%23%20of%20windows%3A%2012"
        );
        assert_eq!(encode_uri_component("-_.!~*'()"), "-_.!~*'()");
        assert_eq!(encode_uri_component("café"), "caf%C3%A9");
    }

    #[test]
    fn test_capability_probe() {
        assert_eq!(Platform::from_ampersand_support(true).sms_separator(), '&');
        assert_eq!(Platform::from_ampersand_support(false).sms_separator(), '?');
    }
}
