use std::fmt;

/// Delivery guarantee requested from the transport for a single operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QoS {
    AtMostOnce,
    AtLeastOnce,
}

impl QoS {
    pub fn as_u8(self) -> u8 {
        match self {
            QoS::AtMostOnce => 0,
            QoS::AtLeastOnce => 1,
        }
    }
}

impl From<u8> for QoS {
    fn from(v: u8) -> Self {
        match v {
            0 => QoS::AtMostOnce,
            _ => QoS::AtLeastOnce,
        }
    }
}

/// Per-operation channel option, rendered into the topic query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelOption {
    /// Time-to-live of a published message, in seconds.
    Ttl(u32),
    /// Number of stored messages to replay on subscribe.
    Last(u32),
}

impl fmt::Display for ChannelOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelOption::Ttl(secs) => write!(f, "ttl={secs}"),
            ChannelOption::Last(count) => write!(f, "last={count}"),
        }
    }
}

/// Makes a topic name from the key/channel pair.
///
/// The result is `<key>/<channel>/<query>` where `<query>` is `?` followed by
/// ampersand-joined options when any are present, and empty otherwise. When
/// the key is empty the key segment and its slash are omitted entirely.
pub fn format_topic(key: &str, channel: &str, options: &[ChannelOption]) -> String {
    let key = key.trim_start_matches('/').trim_end_matches('/');
    let channel = channel.trim_start_matches('/').trim_end_matches('/');

    let mut opts = String::new();
    if !options.is_empty() {
        opts.push('?');
        for (i, option) in options.iter().enumerate() {
            opts.push_str(&option.to_string());
            if i + 1 < options.len() {
                opts.push('&');
            }
        }
    }

    if key.is_empty() {
        return format!("{channel}/{opts}");
    }

    format!("{key}/{channel}/{opts}")
}
