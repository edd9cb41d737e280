use chrono::{Local, NaiveDateTime};
use uuid::Uuid;

/// Source of the two values that differ between otherwise identical renders.
pub trait DocumentStamp: Send + Sync {
    fn now(&self) -> NaiveDateTime;
    fn new_id(&self) -> Uuid;
}

/// Wall clock in local time and random v4 identifiers.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemStamp;

impl DocumentStamp for SystemStamp {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }

    fn new_id(&self) -> Uuid {
        Uuid::new_v4()
    }
}

#[cfg(test)]
#[derive(Debug, Clone, Copy)]
pub struct FixedStamp {
    pub date: NaiveDateTime,
    pub id: Uuid,
}

#[cfg(test)]
impl Default for FixedStamp {
    fn default() -> Self {
        FixedStamp {
            date: chrono::NaiveDate::from_ymd_opt(2024, 3, 1)
                .and_then(|d| d.and_hms_opt(12, 30, 5))
                .expect("valid test date"),
            id: Uuid::from_u128(0x0123_4567_89ab_4def_8123_4567_89ab_cdef),
        }
    }
}

#[cfg(test)]
impl DocumentStamp for FixedStamp {
    fn now(&self) -> NaiveDateTime {
        self.date
    }

    fn new_id(&self) -> Uuid {
        self.id
    }
}
