/*
 * Responsibility
 * - Request stages (pipeline + authorization gate)
 * - Transport-level layers (request id, tracing, limits, cookies)
 */
pub mod gate;
pub mod http;
pub mod pipeline;
