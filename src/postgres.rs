//! Postgres column binding for [`Date`] via sqlx.
//!
//! `DATE` columns round-trip directly. Timestamp-shaped columns
//! (`TIMESTAMP`, `TIMESTAMPTZ`) are accepted on read and decomposed to
//! their date portion in UTC; any other column type is a scan error naming
//! the offending type. `Option<Date>` handles SQL `NULL` through sqlx's
//! blanket impls.

use crate::Date;
use sqlx::encode::IsNull;
use sqlx::error::BoxDynError;
use sqlx::postgres::types::Oid;
use sqlx::postgres::{PgArgumentBuffer, PgHasArrayType, PgTypeInfo, PgValueFormat, PgValueRef};
use sqlx::{Decode, Encode, Postgres, Type, TypeInfo, ValueRef};

/// Days from the Unix epoch to the Postgres epoch (2000-01-01).
const POSTGRES_EPOCH_DAYS: i64 = 10_957;

const MICROS_PER_DAY: i64 = 86_400_000_000;

// 1082 => PgType::Date, 1114 => PgType::Timestamp, 1184 => PgType::Timestamptz
const DATE_OID: Oid = Oid(1082);
const TIMESTAMP_OID: Oid = Oid(1114);
const TIMESTAMPTZ_OID: Oid = Oid(1184);

impl Type<Postgres> for Date {
    fn type_info() -> PgTypeInfo {
        PgTypeInfo::with_oid(DATE_OID)
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        [DATE_OID, TIMESTAMP_OID, TIMESTAMPTZ_OID]
            .iter()
            .any(|&oid| *ty == PgTypeInfo::with_oid(oid))
    }
}

impl PgHasArrayType for Date {
    fn array_type_info() -> PgTypeInfo {
        // 1182 => PgType::DateArray
        PgTypeInfo::with_oid(Oid(1182))
    }
}

impl Encode<'_, Postgres> for Date {
    fn encode_by_ref(&self, buf: &mut PgArgumentBuffer) -> Result<IsNull, BoxDynError> {
        // DATE is encoded as the days since the Postgres epoch
        let days = self.to_unix_days() - POSTGRES_EPOCH_DAYS;
        let days = i32::try_from(days)
            .map_err(|_| format!("Date {self} out of range for Postgres: {days}"))?;
        Encode::<Postgres>::encode(days, buf)
    }

    fn size_hint(&self) -> usize {
        size_of::<i32>()
    }
}

impl<'r> Decode<'r, Postgres> for Date {
    fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
        let type_info = value.type_info().into_owned();
        match type_info.name() {
            "DATE" => Ok(match value.format() {
                PgValueFormat::Binary => {
                    // DATE is encoded as the days since the Postgres epoch
                    let days: i32 = Decode::<Postgres>::decode(value)?;
                    Self::from_unix_days(i64::from(days) + POSTGRES_EPOCH_DAYS)
                }
                PgValueFormat::Text => value.as_str()?.parse()?,
            }),
            "TIMESTAMP" | "TIMESTAMPTZ" => Ok(match value.format() {
                PgValueFormat::Binary => {
                    // Microseconds since the Postgres epoch, UTC for TIMESTAMPTZ.
                    let micros: i64 = Decode::<Postgres>::decode(value)?;
                    Self::from_unix_days(micros.div_euclid(MICROS_PER_DAY) + POSTGRES_EPOCH_DAYS)
                }
                PgValueFormat::Text => {
                    // Timestamp text always leads with its date portion.
                    let s = value.as_str()?;
                    s.get(..10).unwrap_or(s).parse()?
                }
            }),
            other => Err(format!("cannot scan type {other} into Date").into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_info_is_date() {
        assert_eq!(
            <Date as Type<Postgres>>::type_info(),
            PgTypeInfo::with_oid(DATE_OID)
        );
    }

    #[test]
    fn test_compatible_with_timestamp_shapes() {
        for oid in [DATE_OID, TIMESTAMP_OID, TIMESTAMPTZ_OID] {
            assert!(<Date as Type<Postgres>>::compatible(
                &PgTypeInfo::with_oid(oid)
            ));
        }
        // TEXT (25), INT8 (20): not timestamp-shaped.
        for oid in [Oid(25), Oid(20)] {
            assert!(!<Date as Type<Postgres>>::compatible(
                &PgTypeInfo::with_oid(oid)
            ));
        }
    }

    #[test]
    fn test_postgres_epoch_offset() {
        // 2000-01-01 is day zero of the Postgres epoch.
        let epoch = Date::new(2000, 1, 1).unwrap();
        assert_eq!(epoch.to_unix_days(), POSTGRES_EPOCH_DAYS);
        assert_eq!(Date::from_unix_days(POSTGRES_EPOCH_DAYS), epoch);
    }
}
