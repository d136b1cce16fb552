use bytes::Bytes;

/// Аргумент команды, который можно передать серверу.
///
/// Протокол передает все аргументы как групповые (bulk) строки, поэтому
/// числа и логические значения кодируются десятичным текстом, а байты
/// передаются как есть.
pub trait IntoArg {
    /// Преобразует значение в полезную нагрузку кадра `Bulk`.
    fn into_arg(self) -> Bytes;
}

impl IntoArg for Bytes {
    fn into_arg(self) -> Bytes {
        self
    }
}

impl IntoArg for Vec<u8> {
    fn into_arg(self) -> Bytes {
        Bytes::from(self)
    }
}

impl IntoArg for &[u8] {
    fn into_arg(self) -> Bytes {
        Bytes::copy_from_slice(self)
    }
}

impl IntoArg for String {
    fn into_arg(self) -> Bytes {
        Bytes::from(self.into_bytes())
    }
}

impl IntoArg for &String {
    fn into_arg(self) -> Bytes {
        Bytes::copy_from_slice(self.as_bytes())
    }
}

impl IntoArg for &str {
    fn into_arg(self) -> Bytes {
        Bytes::copy_from_slice(self.as_bytes())
    }
}

// `true` передается как `1`, `false` как `0`.
impl IntoArg for bool {
    fn into_arg(self) -> Bytes {
        Bytes::from_static(if self { b"1" } else { b"0" })
    }
}

impl IntoArg for f64 {
    fn into_arg(self) -> Bytes {
        Bytes::from(self.to_string())
    }
}

macro_rules! impl_into_arg_for_int {
    ($($ty:ty),*) => {
        $(
            impl IntoArg for $ty {
                fn into_arg(self) -> Bytes {
                    Bytes::from(self.to_string())
                }
            }
        )*
    };
}

impl_into_arg_for_int!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
