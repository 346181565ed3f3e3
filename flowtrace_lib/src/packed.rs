/** ------------------------------------------------------------
 * Packed log column extraction
 * ------------------------------------------------------------- */
use crate::errors::{FlowtraceError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/**
 * One sub-field of a packed column
 *
 * `radix` is the base the characters are decoded from; fields without
 * a radix are kept as raw text.
 */
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackedField {
    pub name: String,
    pub offset: usize,
    pub len: usize,
    #[serde(default)]
    pub radix: Option<u32>,
}

impl PackedField {
    pub fn decoded(name: &str, offset: usize, len: usize, radix: u32) -> Self {
        Self {
            name: name.to_string(),
            offset,
            len,
            radix: Some(radix),
        }
    }

    pub fn raw(name: &str, offset: usize, len: usize) -> Self {
        Self {
            name: name.to_string(),
            offset,
            len,
            radix: None,
        }
    }

    fn end(&self) -> usize {
        self.offset + self.len
    }
}

/**
 * Declarative layout of a packed column
 */
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackedSchema {
    pub fields: Vec<PackedField>,
}

/**
 * Value of a single sub-field after extraction
 */
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackedValue<'a> {
    Number(u64),
    Raw(&'a str),
}

impl Default for PackedSchema {
    fn default() -> Self {
        Self::hardware()
    }
}

impl PackedSchema {
    /**
     * Layout of the `data` column exported by the hardware pipeline
     *
     * | field  | chars    | content                         |
     * |--------|----------|---------------------------------|
     * | enq    | [0, 8)   | enqueue counter                 |
     * | delta  | [8, 16)  | queueing delay                  |
     * | pushed | [16, 28) | 48-bit enqueue timestamp        |
     * | popped | [28, 40) | 48-bit dequeue timestamp        |
     * | junk   | [40, 48) | padding, "77" followed by color |
     */
    #[rustfmt::skip]
    pub fn hardware() -> Self {
        Self {
            fields: vec![
                PackedField::decoded("enq",     0,  8, 16),
                PackedField::decoded("delta",   8,  8, 16),
                PackedField::decoded("pushed", 16, 12, 16),
                PackedField::decoded("popped", 28, 12, 16),
                PackedField::raw(    "junk",   40,  8),
            ],
        }
    }

    /**
     * Total number of characters covered by the schema
     */
    pub fn width(&self) -> usize {
        self.fields.iter().map(PackedField::end).max().unwrap_or(0)
    }

    /**
     * Ensure fields are sorted, contiguous and start at offset zero
     */
    pub fn validate(&self) -> Result<()> {
        let mut expected_offset = 0;
        for field in &self.fields {
            if field.offset != expected_offset || field.len == 0 {
                return Err(FlowtraceError::PackedSchema {
                    field: field.name.clone(),
                    offset: field.offset,
                });
            }
            expected_offset = field.end();
        }
        Ok(())
    }

    /**
     * Cut a packed value into one slice per schema field
     *
     * Characters past the schema width are ignored.
     */
    pub fn split<'a>(&self, packed: &'a str) -> Result<Vec<&'a str>> {
        let required = self.width();
        if packed.len() < required {
            return Err(FlowtraceError::PackedLength {
                required,
                available: packed.len(),
            });
        }

        self.fields
            .iter()
            .map(|field| {
                packed
                    .get(field.offset..field.end())
                    .ok_or_else(|| FlowtraceError::PackedDecode {
                        field: field.name.clone(),
                        value: packed.to_string(),
                        radix: field.radix.unwrap_or(0),
                    })
            })
            .collect()
    }

    /**
     * Split a packed value and decode every numeric field
     */
    pub fn decode<'a>(&self, packed: &'a str) -> Result<Vec<PackedValue<'a>>> {
        let slices = self.split(packed)?;

        self.fields
            .iter()
            .zip(slices)
            .map(|(field, slice)| match field.radix {
                Some(radix) => u64::from_str_radix(slice, radix)
                    .map(PackedValue::Number)
                    .map_err(|_| FlowtraceError::PackedDecode {
                        field: field.name.clone(),
                        value: slice.to_string(),
                        radix,
                    }),
                None => Ok(PackedValue::Raw(slice)),
            })
            .collect()
    }

    /**
     * Expand `column` of `df` into one column per schema field
     *
     * Decoded fields become `UInt64` columns, raw fields `String`
     * columns. Existing columns with the same names are replaced.
     */
    pub fn unpack_column(&self, df: &mut DataFrame, column: &str) -> Result<()> {
        self.validate()?;

        let packed = df.column(column)?.cast(&DataType::String)?;
        let packed = packed.str()?;

        let mut numbers: Vec<Vec<u64>> = vec![Vec::with_capacity(packed.len()); self.fields.len()];
        let mut raws: Vec<Vec<String>> = vec![Vec::with_capacity(packed.len()); self.fields.len()];

        for (row, value) in packed.into_iter().enumerate() {
            let value = value.ok_or_else(|| FlowtraceError::MissingValue {
                column: column.to_string(),
                row,
            })?;

            for (i, decoded) in self.decode(value)?.into_iter().enumerate() {
                match decoded {
                    PackedValue::Number(n) => numbers[i].push(n),
                    PackedValue::Raw(s) => raws[i].push(s.to_string()),
                }
            }
        }

        for (i, field) in self.fields.iter().enumerate() {
            let series = match field.radix {
                Some(_) => Series::new(&field.name, std::mem::take(&mut numbers[i])),
                None => Series::new(&field.name, std::mem::take(&mut raws[i])),
            };
            df.with_column(series)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROW: &str = "0000002a00000010000000000100000000000118770a0b0c";

    #[test]
    fn hardware_schema_is_contiguous() {
        let schema = PackedSchema::hardware();
        assert!(schema.validate().is_ok());
        assert_eq!(schema.width(), 48);
    }

    #[test]
    fn slices_reassemble_input() {
        let schema = PackedSchema::hardware();
        let inputs = [
            ROW.to_string(),
            "f".repeat(48),
            (0..48).map(|i| char::from(b'a' + (i % 6) as u8)).collect::<String>(),
        ];

        for input in inputs {
            let slices = schema.split(&input).unwrap();
            assert_eq!(slices.len(), 5);
            assert_eq!(slices.concat(), input);

            let lengths: Vec<usize> = slices.iter().map(|s| s.len()).collect();
            assert_eq!(lengths, [8, 8, 12, 12, 8]);
        }
    }

    #[test]
    fn decodes_hex_fields() {
        let values = PackedSchema::hardware().decode(ROW).unwrap();
        assert_eq!(
            values,
            vec![
                PackedValue::Number(0x2a),
                PackedValue::Number(0x10),
                PackedValue::Number(0x100),
                PackedValue::Number(0x118),
                PackedValue::Raw("770a0b0c"),
            ]
        );
    }

    #[test]
    fn short_value_error() {
        let result = PackedSchema::hardware().split("0000002a");
        if let Err(FlowtraceError::PackedLength {
            required,
            available,
        }) = result
        {
            assert_eq!(required, 48);
            assert_eq!(available, 8);
        } else {
            panic!("Expected PackedLength error");
        }
    }

    #[test]
    fn invalid_hex_error() {
        let bad = format!("0000002x{}", &ROW[8..]);
        let result = PackedSchema::hardware().decode(&bad);
        assert!(matches!(
            result,
            Err(FlowtraceError::PackedDecode { ref field, radix: 16, .. }) if field == "enq"
        ));
    }

    #[test]
    fn gap_in_schema_rejected() {
        let schema = PackedSchema {
            fields: vec![
                PackedField::decoded("a", 0, 4, 16),
                PackedField::decoded("b", 6, 4, 16),
            ],
        };
        assert!(matches!(
            schema.validate(),
            Err(FlowtraceError::PackedSchema { offset: 6, .. })
        ));
    }

    #[test]
    fn unpack_dataframe_column() {
        let mut df = polars::df!(
            "data" => [ROW, "00000001000000020000000000050000000000090000ffff"],
            "udp.dstport" => [5001i64, 5002],
        )
        .unwrap();

        PackedSchema::hardware()
            .unpack_column(&mut df, "data")
            .unwrap();

        let pushed: Vec<Option<u64>> = df.column("pushed").unwrap().u64().unwrap().into_iter().collect();
        assert_eq!(pushed, [Some(0x100), Some(0x5)]);

        let junk: Vec<Option<&str>> = df.column("junk").unwrap().str().unwrap().into_iter().collect();
        assert_eq!(junk, [Some("770a0b0c"), Some("0000ffff")]);
        assert_eq!(df.width(), 7);
    }
}
