use log::warn;
use std::borrow::Cow;
use std::fmt::{Display, Formatter};

/// Text carried by a meta event. SMF does not say which encoding text uses, so a parsed payload is
/// kept as a `String` when it is valid UTF-8 and as raw bytes otherwise. Either way
/// [`Text::as_bytes`] gives back exactly what was read.
#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd, Hash)]
pub enum Text {
    Utf8(String),
    Other(Vec<u8>),
}

impl Default for Text {
    fn default() -> Self {
        Text::Utf8(String::new())
    }
}

impl Display for Text {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.as_str(), f)
    }
}

impl From<Vec<u8>> for Text {
    fn from(bytes: Vec<u8>) -> Self {
        match String::from_utf8(bytes) {
            Ok(s) => Text::Utf8(s),
            Err(e) => {
                warn!("non UTF-8 meta text encountered, keeping raw bytes");
                Text::Other(e.into_bytes())
            }
        }
    }
}

impl From<&[u8]> for Text {
    fn from(bytes: &[u8]) -> Self {
        bytes.to_vec().into()
    }
}

impl From<String> for Text {
    fn from(s: String) -> Self {
        Text::Utf8(s)
    }
}

impl From<&str> for Text {
    fn from(s: &str) -> Self {
        Text::Utf8(s.into())
    }
}

impl Text {
    pub fn new<S: Into<String>>(s: S) -> Self {
        Text::Utf8(s.into())
    }

    /// The bytes written to the wire.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Text::Utf8(s) => s.as_bytes(),
            Text::Other(b) => b.as_slice(),
        }
    }

    /// Lossy if the text is not UTF-8.
    pub fn as_str(&self) -> Cow<'_, str> {
        match self {
            Text::Utf8(s) => Cow::Borrowed(s.as_str()),
            Text::Other(b) => String::from_utf8_lossy(b),
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[test]
fn text_from_bytes_test() {
    let text = Text::from(b"zdiugd".to_vec());
    assert_eq!(Text::new("zdiugd"), text);
    let raw = vec![0x41, 0xff, 0x42];
    let text = Text::from(raw.clone());
    assert_eq!(Text::Other(raw.clone()), text);
    assert_eq!(raw.as_slice(), text.as_bytes());
    assert_eq!(3, text.len());
}
