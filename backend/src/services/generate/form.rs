//! Validation of submitted `formData` objects.
//!
//! Values are reduced to the string that ends up in the document. A value
//! that is `null`, `false`, `0` or `""` counts as not filled in and becomes the
//! empty string, which the substitution step renders as `[name]`.

use crate::document::extract::infer_type;
use common::model::form_value::{FormData, FormValue};
use common::model::place_holder::{PlaceHolder, PlaceholderType};
use common::requests::FieldError;
use serde_json::{Number, Value};

/// Converts a raw JSON `formData` object into typed values.
///
/// Each key takes the type of the template placeholder with the same name;
/// keys the template does not declare fall back to the name heuristic. All
/// invalid fields are reported together.
pub fn parse_form_data(
    raw: &Value,
    placeholders: &[PlaceHolder],
) -> Result<FormData, Vec<FieldError>> {
    let Some(object) = raw.as_object() else {
        return Err(vec![FieldError {
            field: "formData".to_string(),
            message: "must be an object of placeholder values".to_string(),
        }]);
    };

    let mut values = FormData::new();
    let mut errors = Vec::new();

    for (key, value) in object {
        let kind = placeholders
            .iter()
            .find(|p| p.name == *key)
            .map(|p| p.placeholder_type)
            .unwrap_or_else(|| infer_type(key));

        match to_display_string(kind, value) {
            Ok(text) => {
                values.insert(key.clone(), FormValue::new(kind, text));
            }
            Err(message) => errors.push(FieldError {
                field: key.clone(),
                message: message.to_string(),
            }),
        }
    }

    if errors.is_empty() {
        Ok(values)
    } else {
        Err(errors)
    }
}

fn to_display_string(kind: PlaceholderType, value: &Value) -> Result<String, &'static str> {
    match value {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s.clone()),
        Value::Array(_) | Value::Object(_) => Err("must be a scalar value"),
        _ if kind == PlaceholderType::Image => Err("must be an image data URI string"),
        Value::Bool(true) => Ok("true".to_string()),
        Value::Bool(false) => Ok(String::new()),
        Value::Number(n) => Ok(number_to_string(n)),
    }
}

fn number_to_string(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if f == 0.0 => String::new(),
        Some(f) => js_number_string(f),
        None => n.to_string(),
    }
}

/// Formats a finite `f64` the way JavaScript's `Number.prototype.toString`
/// does: the shortest round-trip digits, in plain notation when the decimal
/// exponent is within `[-7, 21)` and in `1.5e+21` style otherwise.
fn js_number_string(f: f64) -> String {
    let sci = format!("{:e}", f.abs());
    let (mantissa, exponent) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let k = digits.len() as i32;
    let n = exponent + 1;

    let body = if k <= n && n <= 21 {
        format!("{}{}", digits, "0".repeat((n - k) as usize))
    } else if 0 < n && n <= 21 {
        let (int, frac) = digits.split_at(n as usize);
        format!("{}.{}", int, frac)
    } else if -6 < n && n <= 0 {
        format!("0.{}{}", "0".repeat((-n) as usize), digits)
    } else {
        let sign = if n - 1 < 0 { '-' } else { '+' };
        let (first, rest) = digits.split_at(1);
        let rest = if rest.is_empty() {
            String::new()
        } else {
            format!(".{}", rest)
        };
        format!("{}{}e{}{}", first, rest, sign, (n - 1).abs())
    };

    if f < 0.0 {
        format!("-{}", body)
    } else {
        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::extract::extract_placeholders;
    use serde_json::json;

    fn invoice_placeholders() -> Vec<PlaceHolder> {
        extract_placeholders("{customer_name} {invoice_number} {due_date} {company_logo}")
    }

    #[test]
    fn types_values_by_declared_placeholder() {
        let raw = json!({
            "customer_name": "Acme",
            "invoice_number": 1042,
            "due_date": "2025-03-01",
            "company_logo": "data:image/png;base64,AAAA",
        });
        let values = parse_form_data(&raw, &invoice_placeholders()).unwrap();
        assert_eq!(values["customer_name"], FormValue::Text("Acme".into()));
        assert_eq!(values["invoice_number"], FormValue::Number("1042".into()));
        assert_eq!(values["due_date"], FormValue::Date("2025-03-01".into()));
        assert_eq!(
            values["company_logo"],
            FormValue::Image("data:image/png;base64,AAAA".into())
        );
    }

    #[test]
    fn undeclared_keys_use_the_name_heuristic() {
        let values = parse_form_data(&json!({ "photo": "", "note": "hi" }), &[]).unwrap();
        assert_eq!(values["photo"].kind(), PlaceholderType::Image);
        assert_eq!(values["note"].kind(), PlaceholderType::Text);
    }

    #[test]
    fn falsy_values_become_blank() {
        // A literal 0 is treated as "not filled in" and renders as [total_amount].
        let raw = json!({
            "total_amount": 0,
            "discount_amount": 0.0,
            "customer_name": null,
            "approved": false,
            "notes": "",
        });
        let values = parse_form_data(&raw, &[]).unwrap();
        assert!(values.values().all(FormValue::is_blank));
    }

    #[test]
    fn scalars_follow_javascript_string_conversion() {
        let raw = json!({
            "approved": true,
            "total_amount": 12.5,
            "item_count": 3.0,
            "big_number": 18446744073709551615u64,
            "offset_number": -7,
        });
        let values = parse_form_data(&raw, &[]).unwrap();
        assert_eq!(values["approved"].as_str(), "true");
        assert_eq!(values["total_amount"].as_str(), "12.5");
        assert_eq!(values["item_count"].as_str(), "3");
        assert_eq!(values["big_number"].as_str(), "18446744073709552000");
        assert_eq!(values["offset_number"].as_str(), "-7");
    }

    #[test]
    fn numbers_switch_to_exponent_form_like_javascript() {
        assert_eq!(js_number_string(1e-7), "1e-7");
        assert_eq!(js_number_string(1.5e-7), "1.5e-7");
        assert_eq!(js_number_string(0.000001), "0.000001");
        assert_eq!(js_number_string(0.125), "0.125");
        assert_eq!(js_number_string(123456.789), "123456.789");
        assert_eq!(js_number_string(1e21), "1e+21");
        assert_eq!(js_number_string(-2.5e22), "-2.5e+22");
        assert_eq!(js_number_string(1e20), "100000000000000000000");
        assert_eq!(js_number_string(-0.5), "-0.5");
    }

    #[test]
    fn strings_are_kept_verbatim() {
        let values = parse_form_data(&json!({ "name": "  {other}  " }), &[]).unwrap();
        assert_eq!(values["name"].as_str(), "  {other}  ");
    }

    #[test]
    fn collects_every_invalid_field() {
        let raw = json!({
            "items": [1, 2],
            "address": { "street": "Main" },
            "company_logo": 5,
            "customer_name": "ok",
        });
        let errors = parse_form_data(&raw, &invoice_placeholders()).unwrap_err();
        let mut fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        fields.sort();
        assert_eq!(fields, vec!["address", "company_logo", "items"]);
    }

    #[test]
    fn rejects_non_object_payloads() {
        for raw in [Value::Null, json!([]), json!("text")] {
            let errors = parse_form_data(&raw, &[]).unwrap_err();
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].field, "formData");
        }
    }
}
