//! Request handler definitions
//!
//! Define each route and its handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests:
//! ```nocompile
//!     fn my_handler() -> impl Responder {
//!         std::thread::sleep(Duration::from_secs(5)); // <-- Bad practice! Will cause the current worker thread to
//! hang!
//!     }
//! ```
//! For this reason, any long, non-cpu-bound operation (e.g. I/O, database operations, gateway calls) should be
//! expressed as futures or asynchronous functions. Async handlers get executed concurrently by worker threads and thus
//! don't block execution.
use actix_web::{get, web, HttpResponse, Responder};
use fsp_engine::{
    order_objects::{CreateOrderParams, VerifyPaymentParams},
    traits::{PaymentGateway, PaymentLifecycleDatabase},
    OrderFlowApi,
};
use log::*;

use crate::{
    auth::AuthenticatedCustomer,
    data_objects::{CreateOrderResponse, OrderResponse, OrdersResponse, VerifyPaymentResponse},
    errors::ServerError,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro.
// `route!(name => Method "/path" impl TraitA, TraitB)` registers `name::<A, B>` as the handler, with one type parameter
// per listed trait, in order.
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Orders  ----------------------------------------------------
route!(create_order => Post "/create-order" impl PaymentLifecycleDatabase, PaymentGateway);
/// Route handler for the create-order endpoint
///
/// Opens a payment attempt with the gateway for the authenticated customer and stores the new order. The response
/// carries the gateway order id, the amount in paise and the gateway's public key id, which the client needs to open
/// the checkout form.
pub async fn create_order<B, G>(
    customer: AuthenticatedCustomer,
    body: web::Json<CreateOrderParams>,
    api: web::Data<OrderFlowApi<B, G>>,
) -> Result<HttpResponse, ServerError>
where
    B: PaymentLifecycleDatabase,
    G: PaymentGateway,
{
    debug!("💻️ POST create-order for customer {}", customer.id());
    let result = api.create_order(body.into_inner(), customer.id()).await?;
    Ok(HttpResponse::Ok().json(CreateOrderResponse::from(result)))
}

route!(verify_payment => Post "/verify-payment" impl PaymentLifecycleDatabase, PaymentGateway);
/// Route handler for the verify-payment endpoint
///
/// Checks the signed payload the gateway handed to the client after payment. A signature mismatch is not an error: the
/// caller's pending order is marked as failed and a 400 with `success: false` is returned. Orders that belong to other
/// customers are left untouched.
pub async fn verify_payment<B, G>(
    customer: AuthenticatedCustomer,
    body: web::Json<VerifyPaymentParams>,
    api: web::Data<OrderFlowApi<B, G>>,
) -> Result<HttpResponse, ServerError>
where
    B: PaymentLifecycleDatabase,
    G: PaymentGateway,
{
    debug!("💻️ POST verify-payment from customer {}", customer.id());
    let verification = api.verify_payment(body.into_inner(), customer.id()).await?;
    let response = VerifyPaymentResponse::from(verification);
    if response.success {
        Ok(HttpResponse::Ok().json(response))
    } else {
        info!("💻️ Payment signature mismatch for gateway order {}", response.order_id);
        Ok(HttpResponse::BadRequest().json(response))
    }
}

route!(order_by_id => Get "/order/{order_id}" impl PaymentLifecycleDatabase, PaymentGateway);
/// Route handler for the order-by-id endpoint
///
/// The id may be the internal order id or the gateway order id. Orders that belong to other customers are reported as
/// not found.
pub async fn order_by_id<B, G>(
    customer: AuthenticatedCustomer,
    path: web::Path<String>,
    api: web::Data<OrderFlowApi<B, G>>,
) -> Result<HttpResponse, ServerError>
where
    B: PaymentLifecycleDatabase,
    G: PaymentGateway,
{
    let order_id = path.into_inner();
    debug!("💻️ GET order {order_id} for customer {}", customer.id());
    let order = api.fetch_order_for_customer(&order_id, customer.id()).await?;
    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

route!(my_orders => Get "/my-orders" impl PaymentLifecycleDatabase, PaymentGateway);
/// Route handler for the my-orders endpoint
///
/// Returns every order belonging to the authenticated customer, newest first.
pub async fn my_orders<B, G>(
    customer: AuthenticatedCustomer,
    api: web::Data<OrderFlowApi<B, G>>,
) -> Result<HttpResponse, ServerError>
where
    B: PaymentLifecycleDatabase,
    G: PaymentGateway,
{
    debug!("💻️ GET my-orders for customer {}", customer.id());
    let orders = api.orders_for_customer(customer.id()).await?;
    Ok(HttpResponse::Ok().json(OrdersResponse::from(orders)))
}
