use std::ops::Deref;
use std::str::FromStr;

/// Substrings captured by a route's placeholders, in left-to-right order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(Vec<String>);

impl Params {
    pub fn new(values: Vec<String>) -> Self {
        Self(values)
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    /// Parses the capture at `index`, e.g. the digits of an `<int>` placeholder.
    pub fn parse<T: FromStr>(&self, index: usize) -> Option<T> {
        self.get(index).and_then(|value| value.parse().ok())
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl Deref for Params {
    type Target = [String];

    fn deref(&self) -> &[String] {
        &self.0
    }
}

impl From<Vec<String>> for Params {
    fn from(values: Vec<String>) -> Self {
        Self::new(values)
    }
}

impl<'a> IntoIterator for &'a Params {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

pub type Handler<T> = Box<dyn Fn(&Params) -> T + Send + Sync>;

pub type NotFoundHandler<T> = Box<dyn Fn() -> T + Send + Sync>;
