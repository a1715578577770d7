use super::{CellValue, Conversion, ConversionError, Converter, ConverterContext, ValueType};

/// Converts booleans to text or numbers. Text is passed through unchanged
/// so this converter can head a text pipeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanConverter;

impl Converter<ConverterContext> for BooleanConverter {
    fn can_convert(&self, value: &CellValue, target: ValueType, _context: &ConverterContext) -> bool {
        matches!(
            (value, target),
            (CellValue::Bool(_), ValueType::Text | ValueType::Number | ValueType::Boolean)
                | (CellValue::Text(_), ValueType::Text)
        )
    }

    fn convert(&self, value: &CellValue, target: ValueType, context: &ConverterContext) -> Conversion {
        match (value, target) {
            (CellValue::Bool(b), ValueType::Text) => Ok(CellValue::Text(context.boolean_text(*b).to_string())),
            (CellValue::Bool(b), ValueType::Number) => Ok(CellValue::Number(if *b { 1.0 } else { 0.0 })),
            (CellValue::Bool(b), ValueType::Boolean) => Ok(CellValue::Bool(*b)),
            (CellValue::Text(_), ValueType::Text) => Ok(value.clone()),
            _ => Err(ConversionError::unsupported(value, target)),
        }
    }
}
