use super::{CellValue, Conversion, ConversionError, Converter, ConverterContext, ValueType};

/// Converts numbers to text and booleans to numbers.
///
/// Numbers are written with the shortest digits that round-trip, integral
/// values without a fraction, and the context's decimal separator.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberConverter;

impl NumberConverter {
    fn format(number: f64, context: &ConverterContext) -> Option<String> {
        if !number.is_finite() {
            return None;
        }
        if number.fract() == 0.0 && number.abs() < 1e15 {
            let mut buffer = itoa::Buffer::new();
            return Some(buffer.format(number as i64).to_string());
        }
        let mut buffer = ryu::Buffer::new();
        let text = buffer.format_finite(number);
        Some(if context.decimal_separator == '.' {
            text.to_string()
        } else {
            text.replace('.', context.decimal_separator.encode_utf8(&mut [0; 4]))
        })
    }
}

impl Converter<ConverterContext> for NumberConverter {
    fn can_convert(&self, value: &CellValue, target: ValueType, _context: &ConverterContext) -> bool {
        match (value, target) {
            (CellValue::Number(n), ValueType::Text) => n.is_finite(),
            (CellValue::Number(_), ValueType::Number) | (CellValue::Bool(_), ValueType::Number) => true,
            _ => false,
        }
    }

    fn convert(&self, value: &CellValue, target: ValueType, context: &ConverterContext) -> Conversion {
        match (value, target) {
            (CellValue::Number(n), ValueType::Text) => Self::format(*n, context)
                .map(CellValue::Text)
                .ok_or_else(|| ConversionError::new(format!("cannot format {} as text", n))),
            (CellValue::Number(_), ValueType::Number) => Ok(value.clone()),
            (CellValue::Bool(b), ValueType::Number) => Ok(CellValue::Number(if *b { 1.0 } else { 0.0 })),
            _ => Err(ConversionError::unsupported(value, target)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(n: f64, context: &ConverterContext) -> Conversion {
        NumberConverter.convert(&CellValue::Number(n), ValueType::Text, context)
    }

    #[test]
    fn test_number_to_text() {
        let context = ConverterContext::default();
        assert_eq!(text(42.0, &context), Ok(CellValue::Text("42".into())));
        assert_eq!(text(-7.0, &context), Ok(CellValue::Text("-7".into())));
        assert_eq!(text(0.1, &context), Ok(CellValue::Text("0.1".into())));
        assert_eq!(text(2.5, &context), Ok(CellValue::Text("2.5".into())));
    }

    #[test]
    fn test_decimal_separator() {
        let context = ConverterContext::default().with_decimal_separator(',');
        assert_eq!(text(3.25, &context), Ok(CellValue::Text("3,25".into())));
        assert_eq!(text(3.0, &context), Ok(CellValue::Text("3".into())));
    }

    #[test]
    fn test_non_finite_fails() {
        let context = ConverterContext::default();
        assert!(!NumberConverter.can_convert(&CellValue::Number(f64::NAN), ValueType::Text, &context));
        assert!(text(f64::INFINITY, &context).is_err());
    }

    #[test]
    fn test_boolean_to_number() {
        let context = ConverterContext::default();
        assert_eq!(
            NumberConverter.convert(&CellValue::Bool(true), ValueType::Number, &context),
            Ok(CellValue::Number(1.0))
        );
        assert!(
            NumberConverter
                .convert(&CellValue::Text("1".into()), ValueType::Number, &context)
                .is_err()
        );
    }
}
