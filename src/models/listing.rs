use serde::{Deserialize, Serialize, Serializer};
use serde_json::{json, Map, Value};

// ---------------------------------------------------------------------------
// PriceField
// ---------------------------------------------------------------------------

/// The price of a listing as it arrived from the marketplace.
///
/// The search API returns `{"value": "29.99", "currency": "USD"}`, while older
/// backends flatten it to a bare string or number with an optional sibling
/// `currency` key. Numbers are kept in their text form so that every shape
/// goes through the same parser.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PriceField {
    #[default]
    Absent,
    Bare {
        text: String,
        currency: Option<String>,
    },
    Tagged {
        value: String,
        currency: Option<String>,
    },
}

impl PriceField {
    /// The raw numeric-like text of the price, if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            PriceField::Absent => None,
            PriceField::Bare { text, .. } => Some(text),
            PriceField::Tagged { value, .. } => Some(value),
        }
    }

    /// The currency code attached to the price, if any.
    pub fn currency(&self) -> Option<&str> {
        match self {
            PriceField::Absent => None,
            PriceField::Bare { currency, .. } | PriceField::Tagged { currency, .. } => {
                currency.as_deref()
            }
        }
    }
}

// ---------------------------------------------------------------------------
// CreationDate
// ---------------------------------------------------------------------------

/// When the listing was created, as delivered (ISO text or epoch milliseconds).
#[derive(Debug, Clone, PartialEq)]
pub enum CreationDate {
    Text(String),
    EpochMillis(i64),
}

// ---------------------------------------------------------------------------
// Seller
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Seller {
    pub username: Option<String>,
    /// Positive feedback percentage as delivered, e.g. `"99.2"`.
    pub feedback_percentage: Option<String>,
    pub feedback_score: Option<i64>,
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

/// One search result from the marketplace.
///
/// Built from arbitrary JSON by [`Listing::from_json`], which never fails:
/// fields that are missing or of an unexpected type are simply absent.
/// Serializes back to the Browse API item summary shape.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(from = "Value")]
pub struct Listing {
    pub item_id: Option<String>,
    pub title: Option<String>,
    pub price: PriceField,
    pub condition: Option<String>,
    pub seller: Option<Seller>,
    pub category: Option<String>,
    pub created: Option<CreationDate>,
    pub web_url: Option<String>,
}

impl Listing {
    /// Map any observed record shape onto a `Listing`.
    pub fn from_json(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Listing::default();
        };

        Listing {
            item_id: string_field(obj, "itemId"),
            title: string_field(obj, "title"),
            price: price_field(obj),
            condition: string_field(obj, "condition"),
            seller: seller_field(obj),
            category: category_field(obj),
            created: creation_field(obj),
            web_url: string_field(obj, "itemWebUrl").or_else(|| string_field(obj, "item link")),
        }
    }

    /// Seller username, when the listing has one.
    pub fn seller_name(&self) -> Option<&str> {
        self.seller.as_ref().and_then(|s| s.username.as_deref())
    }

    /// Raw seller feedback percentage text, when the listing has one.
    pub fn seller_feedback(&self) -> Option<&str> {
        self.seller
            .as_ref()
            .and_then(|s| s.feedback_percentage.as_deref())
    }
}

impl From<Value> for Listing {
    fn from(value: Value) -> Self {
        Listing::from_json(&value)
    }
}

// ---------------------------------------------------------------------------
// Adapter helpers
// ---------------------------------------------------------------------------

fn string_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(|v| v.as_str()).map(str::to_string)
}

/// Text of a string or number; `None` for everything else.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn price_field(obj: &Map<String, Value>) -> PriceField {
    match obj.get("price") {
        Some(Value::Object(price)) => match price.get("value").and_then(scalar_text) {
            Some(value) => PriceField::Tagged {
                value,
                currency: string_field(price, "currency"),
            },
            None => PriceField::Absent,
        },
        Some(other) => match scalar_text(other) {
            Some(text) => PriceField::Bare {
                text,
                currency: string_field(obj, "currency"),
            },
            None => PriceField::Absent,
        },
        None => PriceField::Absent,
    }
}

fn seller_field(obj: &Map<String, Value>) -> Option<Seller> {
    let flat_feedback = obj
        .get("sellerFeedback")
        .or_else(|| obj.get("seller feedback"))
        .and_then(scalar_text);

    match obj.get("seller") {
        Some(Value::Object(seller)) => Some(Seller {
            username: string_field(seller, "username"),
            feedback_percentage: seller
                .get("feedbackPercentage")
                .and_then(scalar_text)
                .or(flat_feedback),
            feedback_score: seller.get("feedbackScore").and_then(|v| v.as_i64()),
        }),
        Some(Value::String(name)) => Some(Seller {
            username: Some(name.clone()),
            feedback_percentage: flat_feedback,
            feedback_score: None,
        }),
        _ => flat_feedback.map(|feedback| Seller {
            username: None,
            feedback_percentage: Some(feedback),
            feedback_score: None,
        }),
    }
}

fn category_field(obj: &Map<String, Value>) -> Option<String> {
    obj.get("categories")
        .and_then(|v| v.as_array())
        .and_then(|cats| cats.first())
        .and_then(|first| first.get("categoryName"))
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .or_else(|| string_field(obj, "mainCategory"))
}

fn creation_field(obj: &Map<String, Value>) -> Option<CreationDate> {
    match obj.get("itemCreationDate")? {
        Value::String(s) => Some(CreationDate::Text(s.clone())),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
            .map(CreationDate::EpochMillis),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Serialization back to the item summary shape
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireListing<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    item_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    price: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    currency: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    condition: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    seller: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    categories: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    item_creation_date: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    item_web_url: Option<&'a str>,
}

impl Serialize for Listing {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let (price, currency) = match &self.price {
            PriceField::Absent => (None, None),
            PriceField::Bare { text, currency } => {
                (Some(Value::String(text.clone())), currency.as_deref())
            }
            PriceField::Tagged { value, currency } => {
                let mut obj = Map::new();
                obj.insert("value".into(), Value::String(value.clone()));
                if let Some(c) = currency {
                    obj.insert("currency".into(), Value::String(c.clone()));
                }
                (Some(Value::Object(obj)), None)
            }
        };

        let seller = self.seller.as_ref().map(|s| {
            let mut obj = Map::new();
            if let Some(name) = &s.username {
                obj.insert("username".into(), Value::String(name.clone()));
            }
            if let Some(fb) = &s.feedback_percentage {
                obj.insert("feedbackPercentage".into(), Value::String(fb.clone()));
            }
            if let Some(score) = s.feedback_score {
                obj.insert("feedbackScore".into(), json!(score));
            }
            Value::Object(obj)
        });

        WireListing {
            item_id: self.item_id.as_deref(),
            title: self.title.as_deref(),
            price,
            currency,
            condition: self.condition.as_deref(),
            seller,
            categories: self
                .category
                .as_ref()
                .map(|name| json!([{ "categoryName": name }])),
            item_creation_date: self.created.as_ref().map(|c| match c {
                CreationDate::Text(s) => Value::String(s.clone()),
                CreationDate::EpochMillis(ms) => json!(ms),
            }),
            item_web_url: self.web_url.as_deref(),
        }
        .serialize(serializer)
    }
}
