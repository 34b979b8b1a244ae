macro_rules! impl_from_row_tuple {
    ($len:expr; $($name:ident),+) => {
        impl<$($name: FromValue),+> FromRow for ($($name,)+) {
            const TARGETS: &'static [SqlType] = &[$($name::TARGET),+];

            fn from_values(values: Vec<RowValues>) -> Result<Self, SqlUowError> {
                if values.len() != $len {
                    return Err(SqlUowError::DecodeError(format!(
                        "expected {} value(s), got {}",
                        $len,
                        values.len()
                    )));
                }
                let mut values = values.into_iter();
                Ok(($(
                    $name::from_value(values.next().unwrap_or(RowValues::Null))?,
                )+))
            }
        }
    };
}

pub(super) use impl_from_row_tuple;
