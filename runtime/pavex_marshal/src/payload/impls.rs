use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{Payload, PayloadType};

macro_rules! json_payload {
    ($($t:ty),* $(,)?) => {
        $(
            impl Payload for $t {
                fn payload_type() -> PayloadType {
                    PayloadType::json::<Self>()
                }
            }
        )*
    };
}

json_payload!(
    String,
    bool,
    char,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    f32,
    f64,
    serde_json::Value,
);

impl<T> Payload for Vec<T>
where
    T: Payload + Serialize + DeserializeOwned,
{
    fn payload_type() -> PayloadType {
        PayloadType::json::<Self>().with_type_argument(T::payload_type())
    }
}

impl<T> Payload for Option<T>
where
    T: Payload + Serialize + DeserializeOwned,
{
    fn payload_type() -> PayloadType {
        PayloadType::json::<Self>().with_type_argument(T::payload_type())
    }
}

impl<K, V> Payload for HashMap<K, V>
where
    K: Payload + Serialize + DeserializeOwned + Eq + Hash,
    V: Payload + Serialize + DeserializeOwned,
{
    fn payload_type() -> PayloadType {
        PayloadType::json::<Self>()
            .with_type_argument(K::payload_type())
            .with_type_argument(V::payload_type())
    }
}

impl<K, V> Payload for BTreeMap<K, V>
where
    K: Payload + Serialize + DeserializeOwned + Ord,
    V: Payload + Serialize + DeserializeOwned,
{
    fn payload_type() -> PayloadType {
        PayloadType::json::<Self>()
            .with_type_argument(K::payload_type())
            .with_type_argument(V::payload_type())
    }
}
