#![allow(dead_code)]

use smart_json::{DecodeError, EncodeError, KeyedContainer, KeyedEncodingContainer, Schema, SmartCodable};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct User {
    pub name: String,
    pub age: i64,
    pub email: Option<String>,
    pub score: f64,
    pub active: bool,
}

impl SmartCodable for User {
    fn decode(c: &mut KeyedContainer<'_, '_>) -> Result<Self, DecodeError> {
        Ok(Self {
            name: c.decode("name")?,
            age: c.decode("age")?,
            email: c.decode("email")?,
            score: c.decode("score")?,
            active: c.decode("active")?,
        })
    }

    fn encode(&self, c: &mut KeyedEncodingContainer<'_>) -> Result<(), EncodeError> {
        c.encode("name", &self.name)?;
        c.encode("age", &self.age)?;
        c.encode("email", &self.email)?;
        c.encode("score", &self.score)?;
        c.encode("active", &self.active)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub volume: i64,
    pub theme: String,
    pub retries: u8,
    pub tag: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            volume: 50,
            theme: "dark".into(),
            retries: 3,
            tag: Some("stable".into()),
        }
    }
}

impl SmartCodable for Settings {
    fn decode(c: &mut KeyedContainer<'_, '_>) -> Result<Self, DecodeError> {
        Ok(Self {
            volume: c.decode("volume")?,
            theme: c.decode("theme")?,
            retries: c.decode("retries")?,
            tag: c.decode("tag")?,
        })
    }

    fn encode(&self, c: &mut KeyedEncodingContainer<'_>) -> Result<(), EncodeError> {
        c.encode("volume", &self.volume)?;
        c.encode("theme", &self.theme)?;
        c.encode("retries", &self.retries)?;
        c.encode("tag", &self.tag)
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Item {
    pub id: i64,
    pub title: String,
}

impl SmartCodable for Item {
    fn decode(c: &mut KeyedContainer<'_, '_>) -> Result<Self, DecodeError> {
        Ok(Self {
            id: c.decode("id")?,
            title: c.decode("title")?,
        })
    }

    fn encode(&self, c: &mut KeyedEncodingContainer<'_>) -> Result<(), EncodeError> {
        c.encode("id", &self.id)?;
        c.encode("title", &self.title)
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Order {
    pub id: i64,
    pub owner: User,
    pub items: Vec<Item>,
}

impl SmartCodable for Order {
    fn decode(c: &mut KeyedContainer<'_, '_>) -> Result<Self, DecodeError> {
        Ok(Self {
            id: c.decode("id")?,
            owner: c.decode("owner")?,
            items: c.decode("items")?,
        })
    }

    fn encode(&self, c: &mut KeyedEncodingContainer<'_>) -> Result<(), EncodeError> {
        c.encode("id", &self.id)?;
        c.encode("owner", &self.owner)?;
        c.encode("items", &self.items)
    }
}

/// `value` is read from the first non-null of `a` and `b`.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Remapped {
    pub value: i64,
}

impl SmartCodable for Remapped {
    fn schema() -> Schema {
        Schema::builder().rename("value", ["a", "b"]).build()
    }

    fn decode(c: &mut KeyedContainer<'_, '_>) -> Result<Self, DecodeError> {
        Ok(Self {
            value: c.decode("value")?,
        })
    }

    fn encode(&self, c: &mut KeyedEncodingContainer<'_>) -> Result<(), EncodeError> {
        c.encode("value", &self.value)
    }
}
