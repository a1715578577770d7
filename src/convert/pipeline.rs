use super::{CellValue, Conversion, Converter, ValueType};

/// Two converters run back to back.
///
/// The first converter's result is fed to the second with the same target
/// and context. If the first fails, its error is returned as is and the
/// second is never called.
#[derive(Debug)]
pub struct ConversionPipeline<'a, A: ?Sized, B: ?Sized> {
    first: &'a A,
    second: &'a B,
}

impl<'a, A: ?Sized, B: ?Sized> ConversionPipeline<'a, A, B> {
    pub fn new(first: &'a A, second: &'a B) -> Self {
        Self { first, second }
    }
}

impl<C, A, B> Converter<C> for ConversionPipeline<'_, A, B>
where
    A: Converter<C> + ?Sized,
    B: Converter<C> + ?Sized,
{
    /// Decided by the first converter alone.
    fn can_convert(&self, value: &CellValue, target: ValueType, context: &C) -> bool {
        self.first.can_convert(value, target, context)
    }

    fn convert(&self, value: &CellValue, target: ValueType, context: &C) -> Conversion {
        let intermediate = self.first.convert(value, target, context)?;
        log::trace!(
            "event=pipeline_step module=convert target={} intermediate={:?}",
            target,
            intermediate
        );
        self.second.convert(&intermediate, target, context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::{BooleanConverter, ConversionError, ConverterContext, TextPatternConverter};
    use std::cell::Cell;

    /// Records calls and answers with a fixed result.
    struct Spy {
        calls: Cell<usize>,
        result: Conversion,
    }

    impl Spy {
        fn new(result: Conversion) -> Self {
            Self {
                calls: Cell::new(0),
                result,
            }
        }
    }

    impl Converter<()> for Spy {
        fn can_convert(&self, _: &CellValue, _: ValueType, _: &()) -> bool {
            self.result.is_ok()
        }

        fn convert(&self, _: &CellValue, _: ValueType, _: &()) -> Conversion {
            self.calls.set(self.calls.get() + 1);
            self.result.clone()
        }
    }

    #[test]
    fn test_first_failure_short_circuits() {
        let failure = ConversionError::new("first refused");
        let first = Spy::new(Err(failure.clone()));
        let second = Spy::new(Ok(CellValue::Text("never".into())));
        let pipeline = ConversionPipeline::new(&first, &second);

        let result = pipeline.convert(&CellValue::Number(1.0), ValueType::Text, &());
        assert_eq!(result, Err(failure));
        assert_eq!(first.calls.get(), 1);
        assert_eq!(second.calls.get(), 0);
    }

    #[test]
    fn test_second_receives_first_output() {
        let first = Spy::new(Ok(CellValue::Text("mid".into())));
        let second = Spy::new(Ok(CellValue::Text("done".into())));
        let pipeline = ConversionPipeline::new(&first, &second);

        let result = pipeline.convert(&CellValue::Empty, ValueType::Text, &());
        assert_eq!(result, Ok(CellValue::Text("done".into())));
        assert_eq!((first.calls.get(), second.calls.get()), (1, 1));
    }

    #[test]
    fn test_can_convert_asks_first_only() {
        let first = Spy::new(Ok(CellValue::Empty));
        let second = Spy::new(Err(ConversionError::new("no")));
        assert!(ConversionPipeline::new(&first, &second).can_convert(
            &CellValue::Empty,
            ValueType::Text,
            &()
        ));
        assert!(!ConversionPipeline::new(&second, &first).can_convert(
            &CellValue::Empty,
            ValueType::Text,
            &()
        ));
    }

    #[test]
    fn test_boolean_then_pattern() {
        let context = ConverterContext::default()
            .with_true_text("yes")
            .with_false_text("no");
        let pattern = TextPatternConverter::new("[@]").unwrap();
        let pipeline = ConversionPipeline::new(&BooleanConverter, &pattern);

        assert!(pipeline.can_convert(&CellValue::Bool(false), ValueType::Text, &context));
        assert_eq!(
            pipeline.convert(&CellValue::Bool(false), ValueType::Text, &context),
            Ok(CellValue::Text("[no]".into()))
        );
        // Text passes through the boolean stage untouched.
        assert_eq!(
            pipeline.convert(&CellValue::Text("raw".into()), ValueType::Text, &context),
            Ok(CellValue::Text("[raw]".into()))
        );
        assert!(
            pipeline
                .convert(&CellValue::Date(chrono::NaiveDate::MIN), ValueType::Text, &context)
                .is_err()
        );
    }

    #[test]
    fn test_pipelines_nest() {
        let context = ConverterContext::default();
        let inner_pattern = TextPatternConverter::new("<@>").unwrap();
        let outer_pattern = TextPatternConverter::new("(@)").unwrap();
        let inner = ConversionPipeline::new(&BooleanConverter, &inner_pattern);
        let outer = ConversionPipeline::new(&inner, &outer_pattern);

        assert_eq!(
            outer.convert(&CellValue::Bool(true), ValueType::Text, &context),
            Ok(CellValue::Text("(<TRUE>)".into()))
        );
    }
}
