/// Функция обработки задачи.
///
/// Вызывается одновременно из всех воркеров пула, поэтому обязана быть `Sync`.
/// Возврат `false` означает глобальный сигнал остановки: пул перестает выдавать задачи
/// всем воркерам, а не только текущему.
pub trait Processor<T>: Send + Sync + 'static {
    fn process(&self, item: T) -> bool;
}

impl<T, F> Processor<T> for F
where
    F: Fn(T) -> bool + Send + Sync + 'static,
{
    #[inline]
    fn process(&self, item: T) -> bool {
        self(item)
    }
}


/// Наблюдатель, вызываемый перед обработкой каждой задачи.
///
/// Вызовы сериализованы отдельным локом, поэтому достаточно `Send` и `FnMut`.
pub trait Observer<T>: Send + 'static {
    fn observe(&mut self, item: &T);
}

impl<T, F> Observer<T> for F
where
    F: FnMut(&T) + Send + 'static,
{
    #[inline]
    fn observe(&mut self, item: &T) {
        self(item)
    }
}
