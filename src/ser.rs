//! Conversion of arbitrary `Serialize` values into [`Nested`].
//!
//! Generator output rarely arrives as a [`Nested`] value: it is a
//! `Vec<Vec<f32>>`, a fixed-size array, a tuple of batches. The
//! [`NestedSerializer`] walks any such value through serde and decides, once
//! per node, whether it is a container or a scalar:
//!
//! - **Sequences, tuples, tuple structs, byte slices** become [`Nested::Seq`]
//! - **Integers, floats and booleans** become [`Nested::Leaf`]
//! - **Newtype wrappers and `Some`** are transparent
//! - **Strings, maps, structs, enums and `None`** are rejected
//!
//! ## Usage
//!
//! Most users should go through [`to_value`](crate::to_value):
//!
//! ```rust
//! use seqdump::{to_value, Nested};
//!
//! let batch: Vec<Vec<f32>> = vec![vec![0.5, 1.5], vec![], vec![2.5]];
//! let value = to_value(&batch).unwrap();
//! assert_eq!(value.flatten(), vec![0.5, 1.5, 2.5]);
//!
//! let tuple = (1u8, [2u16, 3u16], true);
//! assert_eq!(to_value(&tuple).unwrap().flatten(), vec![1.0, 2.0, 3.0, 1.0]);
//! ```

use crate::{Error, Nested, Result};
use serde::ser::{self, Impossible, Serialize};

/// Serializer producing a [`Nested`] value.
pub struct NestedSerializer;

/// Accumulates the children of a sequence-like value.
pub struct SerializeVec {
    vec: Vec<Nested>,
}

impl ser::Serializer for NestedSerializer {
    type Ok = Nested;
    type Error = Error;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = Impossible<Nested, Error>;
    type SerializeMap = Impossible<Nested, Error>;
    type SerializeStruct = Impossible<Nested, Error>;
    type SerializeStructVariant = Impossible<Nested, Error>;

    fn serialize_bool(self, v: bool) -> Result<Nested> {
        Ok(Nested::Leaf(if v { 1.0 } else { 0.0 }))
    }

    fn serialize_i8(self, v: i8) -> Result<Nested> {
        Ok(Nested::Leaf(v as f64))
    }

    fn serialize_i16(self, v: i16) -> Result<Nested> {
        Ok(Nested::Leaf(v as f64))
    }

    fn serialize_i32(self, v: i32) -> Result<Nested> {
        Ok(Nested::Leaf(v as f64))
    }

    fn serialize_i64(self, v: i64) -> Result<Nested> {
        Ok(Nested::Leaf(v as f64))
    }

    fn serialize_u8(self, v: u8) -> Result<Nested> {
        Ok(Nested::Leaf(v as f64))
    }

    fn serialize_u16(self, v: u16) -> Result<Nested> {
        Ok(Nested::Leaf(v as f64))
    }

    fn serialize_u32(self, v: u32) -> Result<Nested> {
        Ok(Nested::Leaf(v as f64))
    }

    fn serialize_u64(self, v: u64) -> Result<Nested> {
        Ok(Nested::Leaf(v as f64))
    }

    fn serialize_f32(self, v: f32) -> Result<Nested> {
        Ok(Nested::Leaf(v as f64))
    }

    fn serialize_f64(self, v: f64) -> Result<Nested> {
        Ok(Nested::Leaf(v))
    }

    fn serialize_char(self, _v: char) -> Result<Nested> {
        Err(Error::unsupported_type("char"))
    }

    fn serialize_str(self, _v: &str) -> Result<Nested> {
        Err(Error::unsupported_type("string"))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Nested> {
        Ok(Nested::Seq(v.iter().map(|&b| Nested::Leaf(b as f64)).collect()))
    }

    fn serialize_none(self) -> Result<Nested> {
        Err(Error::unsupported_type("missing value (None)"))
    }

    fn serialize_some<T>(self, value: &T) -> Result<Nested>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Nested> {
        Err(Error::unsupported_type("unit"))
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<Nested> {
        Err(Error::unsupported_type(&format!("unit struct {}", name)))
    }

    fn serialize_unit_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Nested> {
        Err(Error::unsupported_type(&format!("enum variant {}::{}", name, variant)))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Nested>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _value: &T,
    ) -> Result<Nested>
    where
        T: ?Sized + Serialize,
    {
        Err(Error::unsupported_type(&format!("enum variant {}::{}", name, variant)))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeVec> {
        Ok(SerializeVec::with_capacity(len.unwrap_or(0)))
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::with_capacity(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::with_capacity(len))
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(Error::unsupported_type(&format!("enum variant {}::{}", name, variant)))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Err(Error::unsupported_type("map"))
    }

    fn serialize_struct(self, name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Err(Error::unsupported_type(&format!("struct {}", name)))
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(Error::unsupported_type(&format!("enum variant {}::{}", name, variant)))
    }
}

impl SerializeVec {
    fn with_capacity(capacity: usize) -> Self {
        SerializeVec {
            vec: Vec::with_capacity(capacity),
        }
    }
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Nested;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(to_nested(value)?);
        Ok(())
    }

    fn end(self) -> Result<Nested> {
        Ok(Nested::Seq(self.vec))
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = Nested;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(to_nested(value)?);
        Ok(())
    }

    fn end(self) -> Result<Nested> {
        Ok(Nested::Seq(self.vec))
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = Nested;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(to_nested(value)?);
        Ok(())
    }

    fn end(self) -> Result<Nested> {
        Ok(Nested::Seq(self.vec))
    }
}

fn to_nested<T: Serialize + ?Sized>(value: &T) -> Result<Nested> {
    value.serialize(NestedSerializer)
}
