pub mod aliases {
    pub type Fallible<T> = ::anyhow::Result<T>;

    pub type MaybeOwnedString = ::std::borrow::Cow<'static, str>;

    pub type BoxedStream<T> =
        ::std::pin::Pin<::std::boxed::Box<dyn ::futures_core::Stream<Item = T> + ::core::marker::Send>>;
}

macro_rules! progress_style {
    ($template:literal) => {
        ::once_cell::sync::Lazy::new(|| {
            ::indicatif::ProgressStyle::with_template($template).expect("static progress style template")
        })
    };
}

pub(crate) use progress_style;
