//! Core identifier and value types shared across the platform.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

// TnId //
//******//

/// Tenant identifier, the root of the multi-tenancy partition.
///
/// Every client, invoice, reminder rule, and outbox entry is scoped to
/// exactly one tenant. Access across tenants is rejected at the guard
/// boundary, not merely filtered at query time.
#[derive(
	Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
pub struct TnId(pub u32);

impl std::fmt::Display for TnId {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl From<u32> for TnId {
	fn from(tn_id: u32) -> Self {
		TnId(tn_id)
	}
}

// Timestamp //
//***********//

/// Unix timestamp in seconds.
#[derive(
	Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
pub struct Timestamp(pub i64);

impl Timestamp {
	pub fn now() -> Self {
		Timestamp(chrono::Utc::now().timestamp())
	}

	/// ISO-8601 rendering, or `None` if the value is out of chrono's range.
	pub fn to_iso(self) -> Option<String> {
		chrono::DateTime::from_timestamp(self.0, 0)
			.map(|dt| dt.to_rfc3339_opts(chrono::SecondsFormat::Secs, true))
	}
}

impl std::fmt::Display for Timestamp {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// Serializes a `Timestamp` as an ISO-8601 string (raw seconds if out of range).
pub fn serialize_timestamp_iso<S>(ts: &Timestamp, serializer: S) -> Result<S::Ok, S::Error>
where
	S: Serializer,
{
	match ts.to_iso() {
		Some(iso) => serializer.serialize_str(&iso),
		None => serializer.serialize_i64(ts.0),
	}
}

/// Serializes an `Option<Timestamp>` as an ISO-8601 string or null.
pub fn serialize_timestamp_iso_opt<S>(
	ts: &Option<Timestamp>,
	serializer: S,
) -> Result<S::Ok, S::Error>
where
	S: Serializer,
{
	match ts {
		Some(ts) => serialize_timestamp_iso(ts, serializer),
		None => serializer.serialize_none(),
	}
}

// Patch //
//*******//

/// Three-state patch field for partial updates.
///
/// JSON PATCH bodies need to distinguish "field absent" (leave unchanged)
/// from "field null" (clear) from "field present" (set). Deserialize with
/// `#[serde(default)]` so absent fields become `Undefined`.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Patch<T> {
	#[default]
	Undefined,
	Null,
	Value(T),
}

impl<T> Patch<T> {
	pub fn is_undefined(&self) -> bool {
		matches!(self, Patch::Undefined)
	}

	pub fn is_null(&self) -> bool {
		matches!(self, Patch::Null)
	}

	pub fn is_value(&self) -> bool {
		matches!(self, Patch::Value(_))
	}

	pub fn value(&self) -> Option<&T> {
		match self {
			Patch::Value(v) => Some(v),
			_ => None,
		}
	}

	pub fn into_value(self) -> Option<T> {
		match self {
			Patch::Value(v) => Some(v),
			_ => None,
		}
	}

	/// `None` = leave unchanged, `Some(None)` = clear, `Some(Some(v))` = set.
	pub fn as_option(&self) -> Option<Option<&T>> {
		match self {
			Patch::Undefined => None,
			Patch::Null => Some(None),
			Patch::Value(v) => Some(Some(v)),
		}
	}

	pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Patch<U> {
		match self {
			Patch::Undefined => Patch::Undefined,
			Patch::Null => Patch::Null,
			Patch::Value(v) => Patch::Value(f(v)),
		}
	}
}

impl<T> From<Option<T>> for Patch<T> {
	fn from(opt: Option<T>) -> Self {
		match opt {
			Some(v) => Patch::Value(v),
			None => Patch::Null,
		}
	}
}

impl<T: Serialize> Serialize for Patch<T> {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		match self {
			Patch::Value(v) => v.serialize(serializer),
			_ => serializer.serialize_none(),
		}
	}
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		Option::<T>::deserialize(deserializer).map(Into::into)
	}
}


// vim: ts=4
