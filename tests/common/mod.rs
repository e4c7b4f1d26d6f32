//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use chrono::Utc;
use command_guard::executor::{Job, Scheduler};
use command_guard::orders::{ExternalOrderService, Order};
use command_guard::BoxError;

pub fn products() -> Vec<String> {
    vec![
        "Playstation 4".to_string(),
        "TV Phillips".to_string(),
        "Teclado Microsoft".to_string(),
    ]
}

/// The order carries the expected products and was created just now.
pub fn assert_order(order: &Order, products: &[String]) {
    assert!(!order.id.is_nil());
    assert_eq!(order.products, products);
    let age = Utc::now().signed_duration_since(order.created_at);
    assert!(age.num_seconds().abs() < 60, "order created {} ago", age);
}

type Answer = Box<dyn Fn(&[String]) -> Result<Order, BoxError> + Send + Sync>;

/// Programmable order service that counts its calls.
pub struct MockOrderService {
    answer: Answer,
    calls: AtomicUsize,
}

impl MockOrderService {
    pub fn answering<F>(answer: F) -> Self
    where
        F: Fn(&[String]) -> Result<Order, BoxError> + Send + Sync + 'static,
    {
        Self {
            answer: Box::new(answer),
            calls: AtomicUsize::new(0),
        }
    }

    /// Returns a fresh order after `delay`.
    pub fn delayed(delay: Duration) -> Self {
        Self::answering(move |products| {
            std::thread::sleep(delay);
            Ok(Order::new(products.to_vec()))
        })
    }

    /// Fails with `message`.
    pub fn failing(message: &'static str) -> Self {
        Self::answering(move |_| {
            Err(Box::new(std::io::Error::new(std::io::ErrorKind::Other, message)) as BoxError)
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ExternalOrderService for MockOrderService {
    fn create_order(&self, products: &[String]) -> Result<Order, BoxError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        (self.answer)(products)
    }
}

/// Scheduler that holds jobs until the test releases them.
#[derive(Default)]
pub struct ManualScheduler {
    jobs: Mutex<Vec<Job>>,
}

impl ManualScheduler {
    pub fn pending(&self) -> usize {
        self.jobs.lock().unwrap().len()
    }

    /// Run every held job on the calling thread.
    pub fn run_pending(&self) {
        let jobs: Vec<Job> = self.jobs.lock().unwrap().drain(..).collect();
        for job in jobs {
            job();
        }
    }

    /// Drop every held job without running it.
    pub fn reject_pending(&self) {
        self.jobs.lock().unwrap().clear();
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, job: Job) {
        self.jobs.lock().unwrap().push(job);
    }
}
