//! Контейнеры для ожидающих задач.
//!
//! Пул не знает порядка выдачи: он определяется только контейнером.
//! По умолчанию используется `VecDeque` (FIFO).

use std::collections::{BinaryHeap, VecDeque};


pub trait TaskQueue<T>: Send + 'static {
    fn push(&mut self, item: T);

    fn pop(&mut self) -> Option<T>;

    fn len(&self) -> usize;

    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Забирает все задачи разом, чтобы их можно было дропнуть вне лока
    fn drain_all(&mut self) -> Vec<T> {
        let mut items = Vec::with_capacity(self.len());
        while let Some(item) = self.pop() {
            items.push(item);
        }
        items
    }
}

impl<T: Send + 'static> TaskQueue<T> for VecDeque<T> {
    #[inline]
    fn push(&mut self, item: T) {
        self.push_back(item);
    }

    #[inline]
    fn pop(&mut self) -> Option<T> {
        self.pop_front()
    }

    #[inline]
    fn len(&self) -> usize {
        VecDeque::len(self)
    }

    fn drain_all(&mut self) -> Vec<T> {
        self.drain(..).collect()
    }
}

// Наибольший элемент первым
impl<T: Ord + Send + 'static> TaskQueue<T> for BinaryHeap<T> {
    #[inline]
    fn push(&mut self, item: T) {
        BinaryHeap::push(self, item);
    }

    #[inline]
    fn pop(&mut self) -> Option<T> {
        BinaryHeap::pop(self)
    }

    #[inline]
    fn len(&self) -> usize {
        BinaryHeap::len(self)
    }

    fn drain_all(&mut self) -> Vec<T> {
        self.drain().collect()
    }
}
