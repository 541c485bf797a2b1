pub mod aliases {
    pub type Fallible<T> = ::anyhow::Result<T>;

    pub type MaybeOwnedString = ::std::borrow::Cow<'static, str>;

    pub type BoxedStream<T> =
        ::std::pin::Pin<::std::boxed::Box<dyn ::futures_core::Stream<Item = T> + ::core::marker::Send>>;
}

pub mod tasks {
    /// A spawned task tied to the scope that owns it: dropping the handle
    /// aborts the task. Timers and pumps acquired for one video must not
    /// outlive it.
    #[derive(Debug)]
    pub struct ScopedTask {
        handle: ::tokio::task::JoinHandle<()>,
    }

    impl ScopedTask {
        pub fn spawn<F>(future: F) -> Self
        where
            F: ::std::future::Future<Output = ()> + ::core::marker::Send + 'static,
        {
            Self { handle: ::tokio::spawn(future) }
        }
    }

    impl Drop for ScopedTask {
        fn drop(&mut self) {
            self.handle.abort();
        }
    }
}
