use std::{
    borrow::Cow,
    collections::{HashMap, HashSet},
    convert::{TryFrom, TryInto},
    fmt,
    path::PathBuf,
};

use anyhow::Context;

#[derive(Debug)]
pub struct InputParams {
    params: HashMap<String, InputParamsValue>,
    name: Cow<'static, str>,
    visited_names: HashSet<String>,
    base_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputParamsValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    String(String),
    Array(Vec<InputParamsValue>),
}

impl InputParamsValue {
    /// integers are accepted wherever a float is expected, json writers drop the `.0`
    fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    fn as_index(&self) -> Option<usize> {
        match self {
            Self::Int(v) if *v >= 0 => Some(*v as usize),
            _ => None,
        }
    }

    fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for InputParamsValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::Bool(v) => write!(f, "{}", v),
            Self::String(v) => f.write_str(v),
            Self::Array(arr) => {
                for (i, v) in arr.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", v)?;
                }
                Ok(())
            }
        }
    }
}

fn field<'a>(
    params: &'a HashMap<String, InputParamsValue>,
    name: &str,
    key: &str,
) -> anyhow::Result<&'a InputParamsValue> {
    params
        .get(key)
        .with_context(|| format!("{} - there is no '{}' field", name, key))
}

macro_rules! params_get {
    ( $( ( $name:ident, $type:ty, $conv:ident, $hint:expr ) ),+ $(,)? ) => {
        $(
            paste::paste! {
                #[allow(dead_code)]
                pub fn [<get_ $name>](&mut self, key: &str) -> anyhow::Result<$type> {
                    let value = field(&self.params, &self.name, key)?.$conv();
                    if let Some(value) = value {
                        self.visited_names.insert(key.to_owned());
                        return Ok(value);
                    }
                    anyhow::bail!("{} - '{}' should be {}", self.name, key, $hint);
                }

                #[allow(dead_code)]
                pub fn [<get_ $name _or>](&mut self, key: &str, fallback: $type) -> $type {
                    if let Ok(value) = self.[<get_ $name>](key) {
                        value
                    } else {
                        fallback
                    }
                }
            }
        )+
    };
}

macro_rules! params_get_vec {
    ( $( ( $name:ident, $type:ty, $len:expr, $conv:ident, $hint:expr ) ),+ $(,)? ) => {
        $(
            paste::paste! {
                #[allow(dead_code)]
                pub fn [<get_ $name>](&mut self, key: &str) -> anyhow::Result<[$type; $len]> {
                    let error_info = format!(
                        "{} - '{}' should be array with {} {}s",
                        self.name,
                        key,
                        $len,
                        $hint,
                    );
                    if let InputParamsValue::Array(arr) = field(&self.params, &self.name, key)? {
                        if arr.len() == $len {
                            let mut result: [$type; $len] = [Default::default(); $len];
                            for (slot, ele) in result.iter_mut().zip(arr) {
                                *slot = ele.$conv().context(error_info.clone())?;
                            }
                            self.visited_names.insert(key.to_owned());
                            return Ok(result);
                        }
                    }
                    anyhow::bail!(error_info);
                }

                #[allow(dead_code)]
                pub fn [<get_ $name _or>](
                    &mut self,
                    key: &str,
                    fallback: [$type; $len],
                ) -> [$type; $len] {
                    if let Ok(value) = self.[<get_ $name>](key) {
                        value
                    } else {
                        fallback
                    }
                }
            }
        )+
    };
}

macro_rules! params_get_array {
    ( $( ( $name:ident, $type:ty, $conv:ident, $hint:expr ) ),+ $(,)? ) => {
        $(
            paste::paste! {
                #[allow(dead_code)]
                pub fn [<get_ $name _array>](
                    &mut self,
                    key: &str,
                    len: Option<usize>,
                ) -> anyhow::Result<Vec<$type>> {
                    let error_info = if let Some(len) = len {
                        format!("{} - '{}' should be array with {} {}s", self.name, key, len, $hint)
                    } else {
                        format!("{} - '{}' should be array of {}", self.name, key, $hint)
                    };
                    if let InputParamsValue::Array(arr) = field(&self.params, &self.name, key)? {
                        if len.map_or(false, |len| arr.len() != len) {
                            anyhow::bail!(error_info);
                        }
                        let result = arr
                            .iter()
                            .map(|ele| ele.$conv().context(error_info.clone()))
                            .collect::<anyhow::Result<Vec<_>>>()?;
                        self.visited_names.insert(key.to_owned());
                        return Ok(result);
                    }
                    anyhow::bail!(error_info);
                }

                #[allow(dead_code)]
                pub fn [<get_ $name _2darray>](
                    &mut self,
                    key: &str,
                    len1: Option<usize>,
                    len2: Option<usize>,
                ) -> anyhow::Result<Vec<Vec<$type>>> {
                    let error_info = format!(
                        "{} - '{}' should be 2D array with {}x{} {}s",
                        self.name,
                        key,
                        len1.map_or("?".to_owned(), |len| len.to_string()),
                        len2.map_or("?".to_owned(), |len| len.to_string()),
                        $hint,
                    );
                    if let InputParamsValue::Array(arr) = field(&self.params, &self.name, key)? {
                        if len1.map_or(false, |len| arr.len() != len) {
                            anyhow::bail!(error_info);
                        }
                        let mut result = Vec::with_capacity(arr.len());
                        for row in arr {
                            let row = match row {
                                InputParamsValue::Array(row) => row,
                                _ => anyhow::bail!(error_info),
                            };
                            if len2.map_or(false, |len| row.len() != len) {
                                anyhow::bail!(error_info);
                            }
                            let row = row
                                .iter()
                                .map(|ele| ele.$conv().context(error_info.clone()))
                                .collect::<anyhow::Result<Vec<_>>>()?;
                            result.push(row);
                        }
                        self.visited_names.insert(key.to_owned());
                        return Ok(result);
                    }
                    anyhow::bail!(error_info);
                }
            }
        )+
    };
}

impl InputParams {
    pub fn set_name(&mut self, name: Cow<'static, str>) {
        self.name = name;
    }

    pub fn name(&self) -> &str {
        self.name.as_ref()
    }

    pub fn set_base_path(&mut self, path: PathBuf) {
        self.base_path = path;
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    /// Raw access without type checking; the key counts as visited.
    pub fn get_value(&mut self, key: &str) -> Option<&InputParamsValue> {
        let value = self.params.get(key)?;
        self.visited_names.insert(key.to_owned());
        Some(value)
    }

    params_get! {
        (int, i64, as_int, "integer"),
        (float, f64, as_float, "float"),
        (bool, bool, as_bool, "boolean"),
    }

    params_get_vec! {
        (float3, f64, 3, as_float, "float"),
        (index3, usize, 3, as_index, "non-negative integer"),
    }

    params_get_array! {
        (float, f64, as_float, "float"),
        (index, usize, as_index, "non-negative integer"),
    }

    pub fn get_str(&mut self, key: &str) -> anyhow::Result<String> {
        if let InputParamsValue::String(value) = field(&self.params, &self.name, key)? {
            self.visited_names.insert(key.to_owned());
            return Ok(value.clone());
        }
        anyhow::bail!("{} - '{}' should be string", self.name, key);
    }

    #[allow(dead_code)]
    pub fn get_str_or(&mut self, key: &str, fallback: &str) -> String {
        if let Ok(value) = self.get_str(key) {
            value
        } else {
            fallback.to_owned()
        }
    }

    pub fn get_file_path(&mut self, key: &str) -> anyhow::Result<PathBuf> {
        let filename = self.get_str(key)?;
        let path = self.base_path.with_file_name(filename);
        Ok(path)
    }

    pub fn check_unused_keys(&self) {
        for k in self.params.keys() {
            if !k.starts_with('#') && !self.visited_names.contains(k) {
                log::warn!("{} - unused key '{}'", self.name, k);
            }
        }
    }
}

impl Default for InputParams {
    fn default() -> Self {
        Self {
            params: HashMap::new(),
            name: Cow::Borrowed(""),
            visited_names: HashSet::new(),
            base_path: PathBuf::default(),
        }
    }
}

impl TryFrom<&serde_json::Value> for InputParamsValue {
    type Error = anyhow::Error;

    fn try_from(value: &serde_json::Value) -> Result<Self, Self::Error> {
        match value {
            serde_json::Value::Null => {
                anyhow::bail!("can't convert to InputParamsValue from null json")
            }
            serde_json::Value::Bool(v) => Ok(Self::Bool(*v)),
            serde_json::Value::Number(v) => {
                if let Some(v) = v.as_i64() {
                    Ok(Self::Int(v))
                } else {
                    let v = v
                        .as_f64()
                        .with_context(|| format!("can't represent number {} as float", v))?;
                    Ok(Self::Float(v))
                }
            }
            serde_json::Value::String(v) => Ok(Self::String(v.clone())),
            serde_json::Value::Array(arr) => {
                let mut values = Vec::<InputParamsValue>::with_capacity(arr.len());
                for v in arr {
                    match v.try_into() {
                        Ok(v) => values.push(v),
                        Err(e) => anyhow::bail!("can't convert array element: {}", e),
                    }
                }
                Ok(Self::Array(values))
            }
            serde_json::Value::Object(_) => {
                anyhow::bail!("can't convert to InputParamsValue from object json")
            }
        }
    }
}

impl TryFrom<&serde_json::Value> for InputParams {
    type Error = anyhow::Error;

    fn try_from(value: &serde_json::Value) -> Result<Self, Self::Error> {
        if let serde_json::Value::Object(value) = value {
            let mut params = HashMap::<String, InputParamsValue>::with_capacity(value.len());
            for (k, v) in value {
                match v.try_into() {
                    Ok(v) => {
                        params.insert(k.clone(), v);
                    }
                    Err(e) => anyhow::bail!("can't convert member '{}': {}", k, e),
                }
            }
            Ok(Self {
                params,
                ..Default::default()
            })
        } else {
            anyhow::bail!("can't convert to InputParams from non-object json value");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(json: serde_json::Value) -> InputParams {
        let mut params: InputParams = (&json).try_into().unwrap();
        params.set_name("test".into());
        params
    }

    #[test]
    fn float_getter_accepts_integers() {
        let mut p = params(serde_json::json!({ "power": 2, "opacity": 0.5 }));
        assert_eq!(p.get_float("power").unwrap(), 2.0);
        assert_eq!(p.get_float("opacity").unwrap(), 0.5);
    }

    #[test]
    fn missing_key_and_wrong_type_are_reported() {
        let mut p = params(serde_json::json!({ "name": 3 }));
        let err = p.get_str("name").unwrap_err().to_string();
        assert_eq!(err, "test - 'name' should be string");
        let err = p.get_float("power").unwrap_err().to_string();
        assert_eq!(err, "test - there is no 'power' field");
        assert_eq!(p.get_float_or("power", 1.0), 1.0);
    }

    #[test]
    fn float3_requires_exact_length() {
        let mut p = params(serde_json::json!({ "a": [1, 2.5, 3], "b": [1, 2] }));
        assert_eq!(p.get_float3("a").unwrap(), [1.0, 2.5, 3.0]);
        assert!(p.get_float3("b").is_err());
    }

    #[test]
    fn index_2darray_rejects_negative_entries() {
        let mut p = params(serde_json::json!({
            "faces": [[0, 1, 2], [2, 3, 0]],
            "bad": [[0, -1, 2]],
        }));
        let faces = p.get_index_2darray("faces", None, Some(3)).unwrap();
        assert_eq!(faces, vec![vec![0, 1, 2], vec![2, 3, 0]]);
        assert!(p.get_index_2darray("bad", None, Some(3)).is_err());
    }

    #[test]
    fn objects_cannot_be_nested() {
        let json = serde_json::json!({ "rotation": { "angle": 1.0 } });
        let res: anyhow::Result<InputParams> = (&json).try_into();
        assert!(res.is_err());
    }

    #[test]
    fn values_display_as_plain_text() {
        assert_eq!(InputParamsValue::Int(4).to_string(), "4");
        assert_eq!(InputParamsValue::Float(0.25).to_string(), "0.25");
        assert_eq!(
            InputParamsValue::String("--samples 16".to_owned()).to_string(),
            "--samples 16"
        );
    }
}
