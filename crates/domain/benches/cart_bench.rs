use std::collections::HashMap;

use common::{CartId, OrderId, ProductId};
use criterion::{Criterion, criterion_group, criterion_main};
use domain::{
    AddItemToCart, Aggregate, Cart, CartService, CheckoutCart, CreateCart, CustomerDetails,
    GetCart, InMemoryStore, Money, Order, Product, ProductRepository,
};

fn make_product(index: u32) -> Product {
    Product::new(
        ProductId::new(),
        format!("Product {index}"),
        Money::new(&format!("{index}.99"), "EUR").unwrap(),
        1_000,
    )
    .unwrap()
}

fn filled_cart(products: &[Product]) -> Cart {
    let mut cart = Cart::new(CartId::new(), None, "EUR").unwrap();
    for product in products {
        cart.add_item(product, 2).unwrap();
    }
    cart
}

fn bench_add_item(c: &mut Criterion) {
    let products: Vec<_> = (1..=50).map(make_product).collect();

    c.bench_function("cart/add_50_items", |b| {
        b.iter(|| filled_cart(&products));
    });
}

fn bench_total_price(c: &mut Criterion) {
    let products: Vec<_> = (1..=100).map(make_product).collect();
    let cart = filled_cart(&products);

    c.bench_function("cart/total_100_items", |b| {
        b.iter(|| cart.calculate_total_price().unwrap());
    });
}

fn bench_place_order(c: &mut Criterion) {
    let products: Vec<_> = (1..=20).map(make_product).collect();
    let cart = filled_cart(&products);
    let names = HashMap::new();

    c.bench_function("order/place_20_items", |b| {
        b.iter(|| {
            let customer = CustomerDetails::new("bench@example.com", None).unwrap();
            Order::place(OrderId::new(), &cart, customer, &names).unwrap()
        });
    });
}

fn bench_service_cycle(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let store = InMemoryStore::new();
    let service = CartService::new(store.repositories());
    let product = make_product(10);
    rt.block_on(async { ProductRepository::save(&store, &product).await.unwrap() });
    let product_id = product.id().to_string();

    c.bench_function("service/create_add_get_checkout", |b| {
        b.iter(|| {
            rt.block_on(async {
                let cart_id = service
                    .create_cart(CreateCart::new(None, "EUR"))
                    .await
                    .unwrap()
                    .id()
                    .to_string();
                service
                    .add_item(AddItemToCart::new(&cart_id, &product_id, 3))
                    .await
                    .unwrap();
                service.get_cart(GetCart::new(&cart_id)).await.unwrap();
                service
                    .checkout(CheckoutCart::new(&cart_id, "bench@example.com", None))
                    .await
                    .unwrap();
            });
        });
    });
}

criterion_group!(
    benches,
    bench_add_item,
    bench_total_price,
    bench_place_order,
    bench_service_cycle,
);
criterion_main!(benches);
