//! # Controller Resolver
//!
//! Capability-based dispatch over the fixed handler shapes.
//!
//! A registered handler is one of six shapes ([`Handler`]): GET-capable,
//! POST-capable, raw callback, data-producing, data callback, or passthrough
//! sink. Resolution checks capabilities in a fixed priority order so that a
//! registration behaves predictably regardless of the incoming method; see
//! [`dispatch`] for the exact order.
//!
//! Data-producing shapes never write to the sink themselves: their return
//! value is wrapped in a [`JsonResponse`](crate::response::JsonResponse)
//! adapter first. The passthrough shape is the escape hatch for handlers that
//! want the sink directly; it forfeits response application and session save.

mod core;

pub use core::{
    dispatch, DataController, DataFn, Dispatch, GetController, Handler, HandlerFn,
    PostController, SinkController,
};
