//! Integration tests for the public `holyunion` API.
//!
//! ## Access Tests
//! - `test_set_get_round_trip`: The `(i32, u8)` walkthrough, including the
//!   failing access after switching members
//! - `test_empty_access_fails_for_every_member`: An empty union rejects every
//!   typed access
//! - `test_twelve_member_union`: Every position of the largest supported list
//!
//! ## Lifecycle Tests
//! - `test_exclusivity_with_drop_counters`: Exactly one member alive at a time
//! - `test_copy_independence`: Mutating a clone leaves the original intact
//! - `test_move_transfer`: `take` and `move_from` relocate without dropping
//! - `test_move_from_empty`: Moving out of an empty union leaves both sides
//!   empty
//! - `test_self_reassignment`: Reassigning from the union's own clone or take
//! - `test_nested_unions`: A union as a member of another union
//!
//! ## Formatting Tests
//! - `test_display_every_member`: Display output for every member and `U0`
//! - `test_derive_more_members`: Members whose Display is derived
//!
//! ## Error Propagation Tests
//! - `test_error_converts_with_question_mark`: `WrongActiveType` through
//!   `derive_more` errors, `eyre::Report` and `Box<dyn Error>`

use std::{cell::Cell, error::Error, rc::Rc};

use derive_more::{Display, Error, From};
use holyunion::{
    U0, Union, Untagged, WrongActiveType,
    legacy::{Example, PtrUnion, Value, VoidUnion},
};

// Test data structures

/// Counts live instances of each member kind.
#[derive(Default)]
struct Counters {
    first: Rc<Cell<isize>>,
    second: Rc<Cell<isize>>,
}

struct First(Rc<Cell<isize>>);
struct Second(Rc<Cell<isize>>);

macro_rules! counted {
    ($name:ident) => {
        impl $name {
            fn new(live: &Rc<Cell<isize>>) -> Self {
                live.set(live.get() + 1);
                Self(live.clone())
            }
        }

        impl Clone for $name {
            fn clone(&self) -> Self {
                Self::new(&self.0)
            }
        }

        impl Drop for $name {
            fn drop(&mut self) {
                self.0.set(self.0.get() - 1);
            }
        }
    };
}

counted!(First);
counted!(Second);

#[derive(Debug, Display, Clone, PartialEq)]
#[display("{celsius}°C at station {station}")]
struct Reading {
    station: u16,
    celsius: f32,
}

#[derive(Debug, Display, Clone, Copy, PartialEq)]
enum Signal {
    #[display("on")]
    On,
    #[display("off")]
    Off,
}

#[derive(Error, Debug, Display, From)]
enum SensorError {
    #[display("sensor returned the wrong kind of value")]
    Kind(WrongActiveType),
}

type Measurement = Union<(Reading, Signal, U0)>;

fn expect_reading(measurement: &Measurement) -> Result<Reading, SensorError> {
    let reading = measurement.get::<Reading, _>()?;
    Ok(reading.clone())
}

fn expect_signal(measurement: &Measurement) -> eyre::Result<Signal> {
    Ok(*measurement.get::<Signal, _>()?)
}

fn expect_int(example: &Example) -> Result<i32, Box<dyn Error + Send + Sync>> {
    Ok(*example.get::<i32, _>()?)
}

#[test]
fn test_set_get_round_trip() {
    let mut union = Example::new();
    assert_eq!(union.active(), -1);

    union.set(32i32);
    assert!(union.is::<i32, _>());
    assert_eq!(union.get::<i32, _>(), Ok(&32));

    union.set(b'A');
    assert!(union.is::<u8, _>());
    assert_eq!(union.get::<u8, _>(), Ok(&b'A'));

    let error = union.get::<i32, _>().unwrap_err();
    assert_eq!(
        error.to_string(),
        "wrong active type in union: expected `i32`, union holds `u8`"
    );
}

#[test]
fn test_empty_access_fails_for_every_member() {
    let union = VoidUnion::new();
    assert!(union.get::<U0, _>().is_err());
    assert!(union.get::<i32, _>().is_err());
    assert!(union.get::<f64, _>().is_err());
    assert_eq!(union.get::<f64, _>().unwrap_err().found(), None);
}

#[test]
fn test_twelve_member_union() {
    type Wide = Union<(u8, u16, u32, u64, i8, i16, i32, i64, f32, f64, char, bool)>;
    let mut union = Wide::new();

    union.set(1u8);
    assert_eq!(union.active(), 0);
    union.set('x');
    assert_eq!(union.active(), 10);
    union.set(true);
    assert_eq!(union.active(), 11);
    assert_eq!(union.get::<bool, _>(), Ok(&true));
    assert_eq!(Wide::MEMBER_COUNT, 12);
    assert_eq!(Wide::size(), 8);
}

#[test]
fn test_exclusivity_with_drop_counters() {
    let counters = Counters::default();
    let mut union = Union::<(First, Second, u8)>::new();

    union.set(First::new(&counters.first));
    assert_eq!((counters.first.get(), counters.second.get()), (1, 0));

    union.set(Second::new(&counters.second));
    assert_eq!((counters.first.get(), counters.second.get()), (0, 1));

    union.set(0u8);
    assert_eq!((counters.first.get(), counters.second.get()), (0, 0));

    union.set(First::new(&counters.first));
    union.reset();
    union.reset();
    assert_eq!(counters.first.get(), 0);
    assert!(union.is_empty());
}

#[test]
fn test_copy_independence() {
    let mut original = Measurement::with(Reading {
        station: 1,
        celsius: 20.0,
    });
    let mut copy = original.clone();

    copy.get_mut::<Reading, _>().unwrap().celsius = 25.0;
    assert_eq!(original.get::<Reading, _>().unwrap().celsius, 20.0);
    assert_eq!(copy.get::<Reading, _>().unwrap().celsius, 25.0);

    copy.set(Signal::On);
    assert!(original.is::<Reading, _>());
    original.get_mut::<Reading, _>().unwrap().station = 9;
    assert_eq!(copy.get::<Signal, _>(), Ok(&Signal::On));

    let counters = Counters::default();
    let source = Union::<(First, Second)>::with(Second::new(&counters.second));
    let mut target = Union::<(First, Second)>::with(First::new(&counters.first));
    target.clone_from(&source);
    assert_eq!((counters.first.get(), counters.second.get()), (0, 2));
}

#[test]
fn test_move_transfer() {
    let counters = Counters::default();
    let mut source = Union::<(First, Second)>::with(First::new(&counters.first));

    let mut moved = source.take();
    assert!(source.is_empty());
    assert_eq!(moved.active(), 0);
    assert_eq!(counters.first.get(), 1);

    let mut target = Union::<(First, Second)>::with(Second::new(&counters.second));
    target.move_from(&mut moved);
    assert!(moved.is_empty());
    assert_eq!(target.active(), 0);
    assert_eq!((counters.first.get(), counters.second.get()), (1, 0));

    let plain_move = target;
    assert_eq!(plain_move.active(), 0);
    drop(plain_move);
    assert_eq!(counters.first.get(), 0);
}

#[test]
fn test_move_from_empty() {
    let counters = Counters::default();

    let mut empty = Union::<(First, Second)>::new();
    let taken = empty.take();
    assert!(taken.is_empty());
    assert!(empty.is_empty());

    let mut source = Union::<(First, Second)>::new();
    let mut target = Union::<(First, Second)>::new();
    target.move_from(&mut source);
    assert!(target.is_empty());
    assert!(source.is_empty());

    let mut target = Union::<(First, Second)>::with(First::new(&counters.first));
    assert_eq!(counters.first.get(), 1);
    target.move_from(&mut source);
    assert_eq!(counters.first.get(), 0);
    assert!(target.is_empty());
    assert!(source.is_empty());
    assert_eq!((target.active(), source.active()), (-1, -1));
}

#[test]
fn test_self_reassignment() {
    let counters = Counters::default();
    let mut union = Union::<(First, Second)>::with(First::new(&counters.first));

    union = union.clone();
    assert_eq!(union.active(), 0);
    assert_eq!(counters.first.get(), 1);

    union = union.take();
    assert_eq!(union.active(), 0);
    assert_eq!(counters.first.get(), 1);
}

#[test]
fn test_nested_unions() {
    type Inner = Union<(i32, String)>;
    type Outer = Union<(Inner, u8)>;

    let mut outer = Outer::with(Inner::with(String::from("deep")));
    assert_eq!(
        outer
            .get::<Inner, _>()
            .unwrap()
            .get::<String, _>()
            .unwrap(),
        "deep"
    );

    outer.get_mut::<Inner, _>().unwrap().set(5i32);
    assert_eq!(outer.to_string(), "5");
    assert_eq!(
        format!("{outer:?}"),
        "Union { active: 0, value: Union { active: 0, value: 5 } }"
    );

    outer.set(1u8);
    assert_eq!(outer.to_string(), "1");
}

#[test]
fn test_display_every_member() {
    let mut union = VoidUnion::new();
    assert_eq!(union.to_string(), "<empty union>");
    union.set(U0);
    assert_eq!(union.to_string(), "U0");
    union.set(-42i32);
    assert_eq!(union.to_string(), "-42");
    union.set(0.25f64);
    assert_eq!(union.to_string(), "0.25");

    let mut pointers = PtrUnion::new();
    pointers.set(u64::MAX);
    assert_eq!(format!("{pointers:?}"), format!("Union {{ active: 2, value: {} }}", u64::MAX));
}

#[test]
fn test_derive_more_members() {
    let mut measurement = Measurement::with(Reading {
        station: 7,
        celsius: 3.5,
    });
    assert_eq!(measurement.to_string(), "3.5°C at station 7");

    measurement.set(Signal::Off);
    assert_eq!(measurement.to_string(), "off");
    assert_eq!(measurement.active_type_name(), Some(std::any::type_name::<Signal>()));

    measurement.set(Signal::On);
    assert_eq!(measurement.to_string(), "on");
}

#[test]
fn test_error_converts_with_question_mark() {
    let measurement = Measurement::with(Signal::On);

    let error = expect_reading(&measurement).unwrap_err();
    assert_eq!(error.to_string(), "sensor returned the wrong kind of value");
    let SensorError::Kind(inner) = &error;
    assert_eq!(inner.found(), Some(std::any::type_name::<Signal>()));

    assert_eq!(expect_signal(&measurement).unwrap(), Signal::On);
    let report = expect_signal(&Measurement::with(U0)).unwrap_err();
    let inner = report.downcast_ref::<WrongActiveType>().unwrap();
    assert_eq!(inner.found(), Some("holyunion::void::U0"));

    let boxed = expect_int(&Example::with(b'z')).unwrap_err();
    assert!(boxed.to_string().contains("union holds `u8`"));
}

#[test]
fn test_untagged_and_value_layouts() {
    let mut untagged = Untagged::<(u32, [u8; 4])>::new();
    untagged.init(0x0A0B_0C0Du32);
    // SAFETY: all four bytes were written by the `u32`.
    let bytes = unsafe { untagged.reinterpret::<[u8; 4]>() };
    if cfg!(target_endian = "little") {
        assert_eq!(bytes, [0x0D, 0x0C, 0x0B, 0x0A]);
    }

    let mut value = Value::from_char(b'Q');
    assert_eq!(value.to_string(), "Char: 'Q'");
    value.set_float(4.2);
    assert_eq!(value.to_string(), "Float: 4.2");
    assert!(value.as_char().is_err());
}
