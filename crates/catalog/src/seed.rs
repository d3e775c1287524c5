//! Demo dataset: the storefront's categories and product range.

use stroymarket_core::{CategoryId, DomainError, Money, ProductId, VariantId};

use crate::catalog::Catalog;
use crate::product::{Category, NewProduct, Product, ProductVariant, Sale};

fn category(id: &str, name: &str, icon: &str, count: u32) -> Category {
    Category {
        id: CategoryId::new(id),
        name: name.to_string(),
        icon: icon.to_string(),
        count,
    }
}

fn variant(id: &str, name: &str, value: &str, modifier: i64, stock: u32) -> ProductVariant {
    ProductVariant {
        id: VariantId::new(id),
        name: name.to_string(),
        value: value.to_string(),
        price_modifier: Money::new(modifier),
        stock,
    }
}

fn specs(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

fn tags(values: &[&str]) -> Vec<String> {
    values.iter().map(|t| t.to_string()).collect()
}

pub fn categories() -> Vec<Category> {
    vec![
        category("cement", "Цемент и смеси", "Package", 48),
        category("brick", "Кирпич и блоки", "Layers", 63),
        category("lumber", "Пиломатериалы", "TreePine", 35),
        category("metal", "Металлопрокат", "Wrench", 72),
        category("insulation", "Утеплители", "Wind", 29),
        category("roofing", "Кровля", "Home", 41),
        category("tools", "Инструменты", "Hammer", 156),
        category("plumbing", "Сантехника", "Droplets", 94),
    ]
}

pub fn products() -> Result<Vec<Product>, DomainError> {
    let inputs = vec![
        NewProduct {
            id: ProductId::new("p001"),
            name: "Цемент М500 Д0".to_string(),
            category: CategoryId::new("cement"),
            subcategory: "Портландцемент".to_string(),
            price: Money::new(480),
            unit: "мешок 50кг".to_string(),
            description: "Портландцемент М500 Д0 без добавок для бетонных и железобетонных конструкций.".to_string(),
            specs: specs(&[
                ("Марка", "М500"),
                ("Добавки", "Д0 (без добавок)"),
                ("Масса", "50 кг"),
                ("ГОСТ", "31108-2016"),
            ]),
            variants: vec![
                variant("v1", "Фасовка", "25 кг", -240, 450),
                variant("v2", "Фасовка", "50 кг", 0, 820),
            ],
            stock: 820,
            low_stock_threshold: 50,
            sku: "CEM-500-D0-50".to_string(),
            brand: "ЕвроЦемент".to_string(),
            tags: tags(&["цемент", "м500", "строительство", "бетон"]),
            rating: 4.8,
            review_count: 124,
            weight_kg: Some(50.0),
            ..NewProduct::default()
        },
        NewProduct {
            id: ProductId::new("p002"),
            name: "Кирпич рядовой полнотелый".to_string(),
            category: CategoryId::new("brick"),
            subcategory: "Красный кирпич".to_string(),
            price: Money::new(18),
            unit: "шт".to_string(),
            description: "Керамический одинарный полнотелый кирпич для несущих стен и фундаментов.".to_string(),
            specs: specs(&[
                ("Размер", "250×120×65 мм"),
                ("Марка", "М150"),
                ("Морозостойкость", "F50"),
                ("ГОСТ", "530-2012"),
            ]),
            variants: vec![
                variant("v1", "Цвет", "Красный", 0, 15000),
                variant("v2", "Цвет", "Темно-красный", 1, 8000),
                variant("v3", "Цвет", "Персиковый", 2, 3200),
            ],
            stock: 15000,
            low_stock_threshold: 1000,
            sku: "BRK-FULL-M150".to_string(),
            brand: "КирпичЗавод №1".to_string(),
            tags: tags(&["кирпич", "полнотелый", "стены", "фундамент"]),
            rating: 4.6,
            review_count: 89,
            weight_kg: Some(3.3),
            ..NewProduct::default()
        },
        NewProduct {
            id: ProductId::new("p003"),
            name: "Доска обрезная 50×150×6000".to_string(),
            category: CategoryId::new("lumber"),
            subcategory: "Обрезная доска".to_string(),
            price: Money::new(320),
            unit: "пог.м".to_string(),
            description: "Доска обрезная хвойных пород, камерная сушка, влажность 12-16%.".to_string(),
            specs: specs(&[
                ("Сечение", "50×150 мм"),
                ("Длина", "6000 мм"),
                ("Порода", "Сосна/Ель"),
                ("ГОСТ", "8486-86"),
            ]),
            variants: vec![
                variant("v1", "Сорт", "1-й сорт", 80, 200),
                variant("v2", "Сорт", "2-й сорт", 0, 650),
                variant("v3", "Сорт", "3-й сорт", -60, 400),
            ],
            stock: 650,
            low_stock_threshold: 50,
            sku: "LUM-50-150-6000".to_string(),
            brand: "СибЛес".to_string(),
            tags: tags(&["доска", "пиломатериал", "опалубка", "сосна"]),
            rating: 4.7,
            review_count: 56,
            sale: Some(Sale { percent: 15 }),
            weight_kg: Some(18.0),
            ..NewProduct::default()
        },
        NewProduct {
            id: ProductId::new("p004"),
            name: "Арматура А500С 12мм".to_string(),
            category: CategoryId::new("metal"),
            subcategory: "Арматура".to_string(),
            price: Money::new(85),
            unit: "пог.м".to_string(),
            description: "Горячекатаная ребристая арматура класса А500С для армирования железобетона.".to_string(),
            specs: specs(&[
                ("Диаметр", "12 мм"),
                ("Класс", "А500С"),
                ("Длина стержня", "11,7 м"),
                ("ГОСТ", "52544-2006"),
            ]),
            variants: vec![
                variant("v1", "Диаметр", "8 мм", -30, 2000),
                variant("v2", "Диаметр", "10 мм", -10, 1500),
                variant("v3", "Диаметр", "12 мм", 0, 1200),
                variant("v4", "Диаметр", "16 мм", 40, 800),
            ],
            stock: 1200,
            low_stock_threshold: 100,
            sku: "MTL-ARM-A500-12".to_string(),
            brand: "СеверСталь".to_string(),
            tags: tags(&["арматура", "металл", "железобетон", "армирование"]),
            rating: 4.9,
            review_count: 203,
            weight_kg: Some(0.888),
            ..NewProduct::default()
        },
        NewProduct {
            id: ProductId::new("p005"),
            name: "Минвата ROCKWOOL Лайт Баттс".to_string(),
            category: CategoryId::new("insulation"),
            subcategory: "Минеральная вата".to_string(),
            price: Money::new(2840),
            unit: "упаковка".to_string(),
            description: "Плиты из каменной ваты для теплоизоляции стен, полов и перекрытий.".to_string(),
            specs: specs(&[
                ("Размер плиты", "600×800 мм"),
                ("Толщина", "100 мм"),
                ("Кол-во в упаковке", "5 плит (2,4 м²)"),
                ("Группа горючести", "НГ"),
            ]),
            variants: vec![
                variant("v1", "Толщина", "50 мм", -1200, 180),
                variant("v2", "Толщина", "100 мм", 0, 95),
                variant("v3", "Толщина", "150 мм", 1400, 60),
            ],
            stock: 95,
            low_stock_threshold: 20,
            sku: "INS-RW-LIGHT-100".to_string(),
            brand: "ROCKWOOL".to_string(),
            tags: tags(&["утеплитель", "минвата", "теплоизоляция", "rockwool"]),
            rating: 4.7,
            review_count: 78,
            is_new: true,
            weight_kg: Some(12.0),
            ..NewProduct::default()
        },
        NewProduct {
            id: ProductId::new("p006"),
            name: "Профнастил С20 оцинкованный".to_string(),
            category: CategoryId::new("roofing"),
            subcategory: "Профнастил".to_string(),
            price: Money::new(580),
            unit: "м²".to_string(),
            description: "Профлист оцинкованный с полимерным покрытием для кровли, ограждений и фасадов.".to_string(),
            specs: specs(&[
                ("Высота волны", "20 мм"),
                ("Ширина", "1100 мм"),
                ("Толщина металла", "0.5 мм"),
                ("Гарантия", "10 лет"),
            ]),
            variants: vec![
                variant("v1", "Цвет", "RAL 3005 (Вишня)", 20, 450),
                variant("v2", "Цвет", "RAL 6005 (Зелёный)", 20, 320),
                variant("v3", "Цвет", "RAL 8017 (Коричневый)", 20, 280),
                variant("v4", "Цвет", "Оцинкованный", 0, 600),
            ],
            stock: 600,
            low_stock_threshold: 50,
            sku: "ROF-C20-ZINC".to_string(),
            brand: "МеталлПрофиль".to_string(),
            tags: tags(&["профнастил", "кровля", "металл", "ограждение"]),
            rating: 4.5,
            review_count: 145,
            sale: Some(Sale { percent: 10 }),
            weight_kg: Some(5.0),
            ..NewProduct::default()
        },
        NewProduct {
            id: ProductId::new("p007"),
            name: "Перфоратор Bosch GBH 2-26 DRE".to_string(),
            category: CategoryId::new("tools"),
            subcategory: "Перфораторы".to_string(),
            price: Money::new(14990),
            unit: "шт".to_string(),
            description: "Профессиональный перфоратор SDS-plus: сверление, сверление с ударом, долбление.".to_string(),
            specs: specs(&[
                ("Мощность", "800 Вт"),
                ("Энергия удара", "2.7 Дж"),
                ("Патрон", "SDS-plus"),
            ]),
            variants: vec![
                variant("v1", "Комплектация", "Без кейса", 0, 25),
                variant("v2", "Комплектация", "С кейсом", 1500, 12),
            ],
            stock: 25,
            low_stock_threshold: 5,
            sku: "TLS-BSH-GBH226".to_string(),
            brand: "Bosch".to_string(),
            tags: tags(&["перфоратор", "инструмент", "bosch", "электроинструмент"]),
            rating: 4.9,
            review_count: 312,
            weight_kg: Some(2.7),
            ..NewProduct::default()
        },
        NewProduct {
            id: ProductId::new("p008"),
            name: "Клей плиточный UNIS Горизонт".to_string(),
            category: CategoryId::new("cement"),
            subcategory: "Клеи и смеси".to_string(),
            price: Money::new(290),
            unit: "мешок 25кг".to_string(),
            description: "Цементный клей для керамической плитки и керамогранита на горизонтальных основаниях.".to_string(),
            specs: specs(&[
                ("Класс", "С1"),
                ("Расход", "3-5 кг/м²"),
                ("Открытое время", "20 мин"),
            ]),
            variants: vec![
                variant("v1", "Фасовка", "5 кг", -240, 200),
                variant("v2", "Фасовка", "25 кг", 0, 380),
            ],
            stock: 380,
            low_stock_threshold: 30,
            sku: "CEM-UNIS-HOR-25".to_string(),
            brand: "UNIS".to_string(),
            tags: tags(&["плиточный клей", "плитка", "unis", "смесь"]),
            rating: 4.6,
            review_count: 67,
            is_new: true,
            weight_kg: Some(25.0),
            ..NewProduct::default()
        },
    ];

    inputs.into_iter().map(Product::new).collect()
}

pub fn catalog() -> Result<Catalog, DomainError> {
    Catalog::new(categories(), products()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stroymarket_core::AggregateRoot;

    #[test]
    fn seed_catalog_is_valid() {
        let catalog = catalog().unwrap();
        assert_eq!(catalog.categories().len(), 8);
        assert_eq!(catalog.products().len(), 8);
    }

    #[test]
    fn every_product_belongs_to_a_known_category() {
        let catalog = catalog().unwrap();
        for product in catalog.products() {
            assert!(
                catalog.category(product.category()).is_some(),
                "{} has unknown category {}",
                product.id(),
                product.category()
            );
        }
    }

    #[test]
    fn default_variant_is_the_first_one() {
        let catalog = catalog().unwrap();
        let cement = catalog.get(&ProductId::new("p001")).unwrap();
        assert_eq!(cement.default_variant().map(|v| v.value.as_str()), Some("25 кг"));
        assert_eq!(cement.final_unit_price(cement.default_variant().map(|v| &v.id)).unwrap(), Money::new(240));
    }
}
