//! Shared helpers for carousel integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use glide_core::{
    Carousel, CarouselConfig, CarouselEvent, CarouselItem, EventKind,
    TouchCarousel,
};
use uuid::Uuid;

pub fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

/// Records every event a carousel emits.
#[derive(Clone, Default)]
pub struct EventLog(Rc<RefCell<Vec<CarouselEvent>>>);

impl EventLog {
    pub fn sink(&self) -> impl FnMut(&CarouselEvent) + 'static {
        let log = Rc::clone(&self.0);
        move |event| log.borrow_mut().push(event.clone())
    }

    pub fn events(&self) -> Vec<CarouselEvent> {
        self.0.borrow().clone()
    }

    pub fn count(&self, kind: EventKind) -> usize {
        self.0.borrow().iter().filter(|e| e.kind() == kind).count()
    }

    pub fn kinds(&self) -> Vec<EventKind> {
        self.0.borrow().iter().map(CarouselEvent::kind).collect()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

pub fn items(n: usize) -> Vec<CarouselItem<Uuid>> {
    (0..n)
        .map(|i| CarouselItem::new(Uuid::new_v4()).with_title(format!("Slide {i}")))
        .collect()
}

pub fn carousel(
    n: usize,
    config: CarouselConfig,
) -> (Carousel<Uuid>, EventLog, Instant) {
    let t0 = Instant::now();
    let mut carousel = Carousel::new(config);
    for item in items(n) {
        carousel.push(item, t0);
    }
    let log = EventLog::default();
    carousel.subscribe_all(log.sink());
    (carousel, log, t0)
}

pub fn touch_carousel(
    n: usize,
    config: CarouselConfig,
) -> (TouchCarousel<Uuid>, EventLog, Instant) {
    let t0 = Instant::now();
    let mut carousel = TouchCarousel::new(config);
    for item in items(n) {
        carousel.push(item, t0);
    }
    let log = EventLog::default();
    carousel.subscribe_all(log.sink());
    (carousel, log, t0)
}
